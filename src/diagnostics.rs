use crate::error::CommandError;
use crate::field_set::SanitizedFields;
use crate::outcome::ValidationOutcome;
use serde::Serialize;

pub const WARNING_PREFIX: &str = "tagbridge warning:";
pub const ERROR_PREFIX: &str = "tagbridge error:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    #[default]
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl LogLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" | "min" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            "notice" => Some(Self::Notice),
            "info" => Some(Self::Info),
            "debug" | "max" => Some(Self::Debug),
            _ => None,
        }
    }

    pub fn is_most_verbose(self) -> bool {
        self == Self::Debug
    }
}

/// Diagnostic channel gated on the bridge log level.
///
/// Nothing is emitted unless the level is [`LogLevel::Debug`]; correct
/// operation never depends on these messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostics {
    level: LogLevel,
}

impl Diagnostics {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    pub fn enabled(&self) -> bool {
        self.level.is_most_verbose()
    }

    pub fn warning(&self, message: &str) {
        if self.enabled() {
            tracing::warn!(target: "tagbridge", "{WARNING_PREFIX} {message}");
        }
    }

    pub fn error(&self, message: &str) {
        if self.enabled() {
            tracing::error!(target: "tagbridge", "{ERROR_PREFIX} {message}");
        }
    }

    pub fn command_failed(&self, err: &CommandError) {
        self.error(&err.to_string());
    }

    pub fn outcome(&self, context: &str, outcome: &ValidationOutcome) {
        if !self.enabled() {
            return;
        }
        let original = outcome.original.as_deref().unwrap_or("<none>");
        let resolved = outcome.resolved.as_deref().unwrap_or("<none>");
        if !outcome.accepted {
            self.error(&format!(
                "{context}: {} (`{original}` replaced by `{resolved}`)",
                outcome.message
            ));
        } else if outcome.was_modified() {
            self.warning(&format!(
                "{context}: {} (`{original}` -> `{resolved}`)",
                outcome.message
            ));
        }
    }

    pub fn sanitized_fields(&self, context: &str, sanitized: &SanitizedFields) {
        if !self.enabled() {
            return;
        }
        for report in &sanitized.reports {
            if report.dropped() {
                let key = report.key.original.as_deref().unwrap_or("<none>");
                self.error(&format!(
                    "{context}: dropped parameter `{key}`: {}",
                    report.key.message
                ));
                continue;
            }
            self.outcome(context, &report.key);
            if let Some(value) = &report.value {
                let key = report.key.resolved.as_deref().unwrap_or("<none>");
                self.warning(&format!("{context}: `{key}`: {}", value.message));
            }
        }
    }
}
