use crate::diagnostics::LogLevel;
use crate::dispatcher::DEFAULT_COMMAND_SEPARATOR;
use crate::env_util::{self, CONFIG_PATH_ENV, LOG_LEVEL_ENV, STRICT_INPUT_ENV};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "bridge.toml";

/// Process settings for the bridge binary. Grammar toggles are deliberately absent:
/// they only change through a config command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_level: LogLevel,
    pub command_separator: char,
    pub strict_input: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            command_separator: DEFAULT_COMMAND_SEPARATOR,
            strict_input: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    log_level: Option<String>,
    command_separator: Option<String>,
}

pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "tagbridge")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".tagbridge"))
}

pub fn load() -> Result<Settings> {
    let mut settings = match env_util::env_path_override(CONFIG_PATH_ENV) {
        Some(path) => load_file(&path)?,
        None => {
            let path = config_dir().join(SETTINGS_FILE_NAME);
            if path.is_file() {
                load_file(&path)?
            } else {
                Settings::default()
            }
        }
    };
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

pub fn load_file(path: &Path) -> Result<Settings> {
    let content = fs_err::read_to_string(path)
        .with_context(|| format!("failed to read bridge settings {}", path.display()))?;
    parse_settings(&content).with_context(|| format!("invalid settings in {}", path.display()))
}

pub fn parse_settings(content: &str) -> Result<Settings> {
    let file: SettingsFile = toml::from_str(content)?;
    let mut settings = Settings::default();
    if let Some(level) = file.log_level {
        settings.log_level = parse_log_level(&level, "field `log_level`")?;
    }
    if let Some(separator) = file.command_separator {
        settings.command_separator = parse_separator(&separator)?;
    }
    Ok(settings)
}

fn apply_env_overrides(settings: &mut Settings) -> Result<()> {
    if let Some(level) = env_util::env_text_override(LOG_LEVEL_ENV) {
        settings.log_level = parse_log_level(&level, LOG_LEVEL_ENV)?;
    }
    settings.strict_input = env_util::env_flag_enabled(STRICT_INPUT_ENV);
    Ok(())
}

fn parse_log_level(value: &str, field: &str) -> Result<LogLevel> {
    LogLevel::parse(value).ok_or_else(|| {
        anyhow!("{field} must be one of error/warning/notice/info/debug/min/max; got `{value}`")
    })
}

fn parse_separator(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_whitespace() && !ch.is_ascii_alphanumeric() => Ok(ch),
        _ => Err(anyhow!(
            "field `command_separator` must be a single punctuation character; got `{value}`"
        )),
    }
}
