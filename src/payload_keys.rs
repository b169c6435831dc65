pub const COMMAND_NAME: &str = "command_name";

pub const SESSION_TIMEOUT_SECONDS: &str = "session_timeout_seconds";
pub const SESSION_MINIMUM_SECONDS: &str = "session_minimum_seconds";
pub const ANALYTICS_ENABLED: &str = "analytics_enabled";
pub const LOG_LEVEL: &str = "log_level";
pub const INVALID_CHARACTER_POLICY: &str = "invalid_character_policy";
pub const EXTENDED_VALUE_LENGTH: &str = "extended_value_length";

pub const EVENT_NAME: &str = "event_name";
pub const EVENT_PARAMS: &str = "event_params";
pub const DIRECT_PARAMETER_PREFIX: &str = "param_";
pub const ITEMS: &str = "items";

pub const SCREEN_NAME: &str = "screen_name";
pub const SCREEN_CLASS: &str = "screen_class";

pub const PROPERTY_NAME: &str = "property_name";
pub const PROPERTY_VALUE: &str = "property_value";

pub const USER_ID: &str = "user_id";

pub const DEFAULT_PARAMS: &str = "default_params";
pub const DEFAULT_PARAMS_FALLBACK: &str = "params";

pub const CONSENT_SETTINGS: &str = "consent_settings";

pub const HASHED_EMAIL_ADDRESS: &str = "hashed_email_address";
pub const HASHED_PHONE_NUMBER: &str = "hashed_phone_number";
pub const EMAIL_ADDRESS: &str = "email_address";
pub const PHONE_NUMBER: &str = "phone_number";

pub const CONVERSION_IDENTIFIER_FIELDS: [&str; 4] = [
    HASHED_EMAIL_ADDRESS,
    HASHED_PHONE_NUMBER,
    EMAIL_ADDRESS,
    PHONE_NUMBER,
];
