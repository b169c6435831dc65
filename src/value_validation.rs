use crate::grammar::{GrammarConfig, USER_PROPERTY_VALUE_LIMIT};
use crate::outcome::ValidationOutcome;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Parameter,
    UserProperty,
}

impl ValueKind {
    pub fn limit(self, config: &GrammarConfig) -> usize {
        match self {
            Self::Parameter => config.parameter_value_limit(),
            Self::UserProperty => USER_PROPERTY_VALUE_LIMIT,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Parameter => "Parameter",
            Self::UserProperty => "User property",
        }
    }
}

/// Counts user-perceived characters.
pub fn display_length(value: &str) -> usize {
    value.graphemes(true).count()
}

pub fn validate_value(raw: Option<&str>, kind: ValueKind, limit: usize) -> ValidationOutcome {
    let Some(value) = raw else {
        return ValidationOutcome::unchanged(None);
    };
    match truncate_graphemes(value, limit) {
        None => ValidationOutcome::unchanged(Some(value)),
        Some(truncated) => ValidationOutcome::repaired(
            value,
            truncated.to_string(),
            format!("{} value truncated to {limit} characters", kind.label()),
        ),
    }
}

pub fn validate_parameter_value(raw: Option<&str>, config: &GrammarConfig) -> ValidationOutcome {
    let kind = ValueKind::Parameter;
    validate_value(raw, kind, kind.limit(config))
}

pub fn validate_user_property_value(
    raw: Option<&str>,
    config: &GrammarConfig,
) -> ValidationOutcome {
    let kind = ValueKind::UserProperty;
    validate_value(raw, kind, kind.limit(config))
}

/// Returns the first `limit` graphemes of `value`, or `None` when it already fits.
fn truncate_graphemes(value: &str, limit: usize) -> Option<&str> {
    let (cut, _) = value.grapheme_indices(true).nth(limit)?;
    Some(&value[..cut])
}
