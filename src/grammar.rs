pub const RESERVED_PREFIXES: [&str; 3] = ["firebase_", "google_", "ga_"];

pub const PARAMETER_VALUE_LIMIT: usize = 100;
pub const EXTENDED_PARAMETER_VALUE_LIMIT: usize = 500;
pub const USER_PROPERTY_VALUE_LIMIT: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidCharacterPolicy {
    #[default]
    Replace,
    Remove,
}

impl InvalidCharacterPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Some(Self::Replace),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

/// Grammar toggles threaded into every validation call.
///
/// Owned by the dispatcher and only changed by an explicit config command;
/// outcomes computed under an earlier configuration are never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrammarConfig {
    pub invalid_character_policy: InvalidCharacterPolicy,
    pub extended_value_length: bool,
}

impl GrammarConfig {
    pub fn parameter_value_limit(&self) -> usize {
        if self.extended_value_length {
            EXTENDED_PARAMETER_VALUE_LIMIT
        } else {
            PARAMETER_VALUE_LIMIT
        }
    }
}

/// Returns the reserved prefix `name` starts with, matched case-insensitively.
pub fn reserved_prefix_of(name: &str) -> Option<&'static str> {
    RESERVED_PREFIXES.into_iter().find(|prefix| {
        name.len() >= prefix.len()
            && name.is_char_boundary(prefix.len())
            && name[..prefix.len()].eq_ignore_ascii_case(prefix)
    })
}
