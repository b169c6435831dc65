use crate::value_model::FieldSet;
use std::collections::HashMap;
use std::sync::OnceLock;

const EVENT_TAG_PREFIX: &str = "event_";
const PARAMETER_TAG_PREFIX: &str = "param_";

const SDK_EVENT_NAMES: &[&str] = &[
    "ad_impression",
    "add_payment_info",
    "add_shipping_info",
    "add_to_cart",
    "add_to_wishlist",
    "app_open",
    "begin_checkout",
    "campaign_details",
    "earn_virtual_currency",
    "generate_lead",
    "join_group",
    "level_end",
    "level_start",
    "level_up",
    "login",
    "post_score",
    "purchase",
    "refund",
    "remove_from_cart",
    "screen_view",
    "search",
    "select_content",
    "select_item",
    "select_promotion",
    "share",
    "sign_up",
    "spend_virtual_currency",
    "tutorial_begin",
    "tutorial_complete",
    "unlock_achievement",
    "view_cart",
    "view_item",
    "view_item_list",
    "view_promotion",
    "view_search_results",
];

const EVENT_SYNONYMS: &[(&str, &str)] = &[
    ("cart_add", "add_to_cart"),
    ("cart_remove", "remove_from_cart"),
    ("cart_view", "view_cart"),
    ("checkout", "begin_checkout"),
    ("order", "purchase"),
    ("product_view", "view_item"),
    ("product_list_view", "view_item_list"),
    ("product_click", "select_item"),
    ("promo_view", "view_promotion"),
    ("promo_click", "select_promotion"),
    ("site_search", "search"),
    ("user_login", "login"),
    ("user_register", "sign_up"),
    ("wishlist_add", "add_to_wishlist"),
    ("tutorial_start", "tutorial_begin"),
];

const SDK_PARAMETER_NAMES: &[&str] = &[
    "achievement_id",
    "ad_format",
    "ad_platform",
    "ad_source",
    "ad_unit_name",
    "affiliation",
    "campaign",
    "character",
    "content",
    "content_type",
    "coupon",
    "creative_name",
    "creative_slot",
    "currency",
    "destination",
    "discount",
    "end_date",
    "extend_session",
    "flight_number",
    "group_id",
    "index",
    "item_brand",
    "item_category",
    "item_category2",
    "item_category3",
    "item_category4",
    "item_category5",
    "item_id",
    "item_list_id",
    "item_list_name",
    "item_name",
    "item_variant",
    "items",
    "level",
    "level_name",
    "location",
    "location_id",
    "medium",
    "method",
    "number_of_nights",
    "number_of_passengers",
    "number_of_rooms",
    "origin",
    "payment_type",
    "price",
    "promotion_id",
    "promotion_name",
    "quantity",
    "score",
    "screen_class",
    "screen_name",
    "search_term",
    "shipping",
    "shipping_tier",
    "source",
    "start_date",
    "success",
    "tax",
    "term",
    "transaction_id",
    "travel_class",
    "value",
    "virtual_currency_name",
];

const PARAMETER_SYNONYMS: &[(&str, &str)] = &[
    ("product_id", "item_id"),
    ("product_name", "item_name"),
    ("product_brand", "item_brand"),
    ("product_category", "item_category"),
    ("product_variant", "item_variant"),
    ("product_quantity", "quantity"),
    ("product_price", "price"),
    ("order_id", "transaction_id"),
    ("order_currency", "currency"),
    ("order_total", "value"),
    ("order_tax", "tax"),
    ("order_shipping", "shipping"),
    ("order_coupon_code", "coupon"),
    ("search_keyword", "search_term"),
];

struct NameTable {
    tag_prefix: &'static str,
    sdk_names: &'static [&'static str],
    synonyms: HashMap<&'static str, &'static str>,
}

impl NameTable {
    fn new(
        tag_prefix: &'static str,
        sdk_names: &'static [&'static str],
        synonyms: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            tag_prefix,
            sdk_names,
            synonyms: synonyms.iter().copied().collect(),
        }
    }

    fn map<'a>(&self, name: &'a str) -> &'a str {
        if let Some(mapped) = self.synonyms.get(name) {
            return *mapped;
        }
        if let Some(stem) = name.strip_prefix(self.tag_prefix) {
            if let Some(sdk) = self.sdk_names.iter().find(|sdk| **sdk == stem) {
                return *sdk;
            }
        }
        name
    }
}

fn event_table() -> &'static NameTable {
    static TABLE: OnceLock<NameTable> = OnceLock::new();
    TABLE.get_or_init(|| NameTable::new(EVENT_TAG_PREFIX, SDK_EVENT_NAMES, EVENT_SYNONYMS))
}

fn parameter_table() -> &'static NameTable {
    static TABLE: OnceLock<NameTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        NameTable::new(PARAMETER_TAG_PREFIX, SDK_PARAMETER_NAMES, PARAMETER_SYNONYMS)
    })
}

/// Maps a tag-vocabulary event name to its SDK name; unknown names map to themselves.
pub fn map_event_name(name: &str) -> &str {
    event_table().map(name)
}

pub fn map_parameter_name(name: &str) -> &str {
    parameter_table().map(name)
}

/// Renames every key of `fields`; a later key wins when two map to the same name.
pub fn map_parameter_names(fields: &FieldSet) -> FieldSet {
    fields
        .iter()
        .map(|(key, value)| (map_parameter_name(key).to_string(), value.clone()))
        .collect()
}
