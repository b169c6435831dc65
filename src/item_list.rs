use crate::value_model::FieldSet;
use serde_json::Value;
use std::collections::BTreeMap;

const ITEM_KEY_PREFIX: &str = "item_";
const ITEM_FIXED_KEYS: [&str; 2] = ["quantity", "price"];

pub fn is_item_key(key: &str) -> bool {
    key.starts_with(ITEM_KEY_PREFIX) || ITEM_FIXED_KEYS.contains(&key)
}

/// Keeps item keys only, wrapping scalar values in one-element sequences.
pub fn normalize_to_parallel_arrays(fields: &FieldSet) -> BTreeMap<String, Vec<Value>> {
    fields
        .iter()
        .filter(|(key, _)| is_item_key(key))
        .map(|(key, value)| {
            let values = match value {
                Value::Array(values) => values.clone(),
                scalar => vec![scalar.clone()],
            };
            (key.clone(), values)
        })
        .collect()
}

/// Turns parallel per-key sequences into one record per item.
///
/// A key whose sequence is shorter than the record index is omitted from that
/// record rather than padded.
pub fn transpose(fields: &FieldSet) -> Vec<FieldSet> {
    let columns = normalize_to_parallel_arrays(fields);
    let count = columns.values().map(Vec::len).max().unwrap_or(0);
    (0..count)
        .map(|index| {
            columns
                .iter()
                .filter_map(|(key, values)| {
                    values.get(index).map(|value| (key.clone(), value.clone()))
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{is_item_key, normalize_to_parallel_arrays, transpose};
    use crate::value_model::FieldSet;
    use serde_json::{json, Value};

    fn fields(value: Value) -> FieldSet {
        serde_json::from_value(value).expect("field set")
    }

    #[test]
    fn item_key_predicate_covers_prefix_and_fixed_keys() {
        assert!(is_item_key("item_id"));
        assert!(is_item_key("quantity"));
        assert!(is_item_key("price"));
        assert!(!is_item_key("currency"));
        assert!(!is_item_key("items"));
    }

    #[test]
    fn normalization_wraps_scalars_and_drops_unrelated_keys() {
        let input = fields(json!({"item_id": "sku1", "price": [1, 2], "currency": "USD"}));
        let columns = normalize_to_parallel_arrays(&input);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns["item_id"], vec![json!("sku1")]);
        assert_eq!(columns["price"], vec![json!(1), json!(2)]);
    }

    #[test]
    fn equal_length_columns_transpose_into_records() {
        let input = fields(json!({"item_key1": ["a", "b"], "item_key2": [1, 2]}));
        let records = transpose(&input);
        assert_eq!(
            records,
            vec![
                fields(json!({"item_key1": "a", "item_key2": 1})),
                fields(json!({"item_key1": "b", "item_key2": 2})),
            ]
        );
    }

    #[test]
    fn single_element_columns_yield_one_complete_record() {
        let input = fields(json!({"item_id": ["sku"], "item_name": ["Shoe"], "quantity": [2]}));
        let records = transpose(&input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 3);
    }

    #[test]
    fn shorter_columns_are_omitted_from_later_records() {
        let input = fields(json!({"item_id": ["a"], "item_name": ["x", "y"]}));
        let records = transpose(&input);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], fields(json!({"item_name": "y"})));
    }

    #[test]
    fn no_item_keys_means_no_items() {
        let input = fields(json!({"currency": "USD"}));
        assert!(transpose(&input).is_empty());
    }
}
