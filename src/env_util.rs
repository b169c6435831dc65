use std::env;
use std::path::PathBuf;

pub const CONFIG_PATH_ENV: &str = "TAGBRIDGE_CONFIG";
pub const LOG_LEVEL_ENV: &str = "TAGBRIDGE_LOG_LEVEL";
pub const STRICT_INPUT_ENV: &str = "TAGBRIDGE_STRICT_INPUT";

pub fn env_flag_enabled(name: &str) -> bool {
    let Ok(value) = env::var(name) else {
        return false;
    };
    let normalized = value.trim().to_ascii_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
}

pub fn env_path_override(name: &str) -> Option<PathBuf> {
    env_text_override(name).map(PathBuf::from)
}

pub fn env_text_override(name: &str) -> Option<String> {
    let value = env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
