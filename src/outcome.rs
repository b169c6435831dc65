pub const VALID_MESSAGE: &str = "Valid";

/// Result of checking one string against one grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub accepted: bool,
    pub original: Option<String>,
    pub resolved: Option<String>,
    pub message: String,
}

impl ValidationOutcome {
    pub(crate) fn unchanged(original: Option<&str>) -> Self {
        Self {
            accepted: true,
            original: original.map(str::to_string),
            resolved: original.map(str::to_string),
            message: VALID_MESSAGE.to_string(),
        }
    }

    pub(crate) fn repaired(original: &str, resolved: String, message: String) -> Self {
        Self {
            accepted: true,
            original: Some(original.to_string()),
            resolved: Some(resolved),
            message,
        }
    }

    pub(crate) fn rejected(original: Option<&str>, fallback: &str, message: String) -> Self {
        Self {
            accepted: false,
            original: original.map(str::to_string),
            resolved: Some(fallback.to_string()),
            message,
        }
    }

    pub fn was_modified(&self) -> bool {
        match &self.original {
            Some(original) => self.accepted && self.resolved.as_deref() != Some(original),
            None => false,
        }
    }

    pub fn resolved_str(&self) -> Option<&str> {
        self.resolved.as_deref()
    }
}
