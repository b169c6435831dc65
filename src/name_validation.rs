use crate::grammar::{reserved_prefix_of, GrammarConfig, InvalidCharacterPolicy};
use crate::outcome::ValidationOutcome;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Event,
    Parameter,
    UserProperty,
}

impl NameKind {
    pub fn max_length(self) -> usize {
        match self {
            Self::Event | Self::Parameter => 40,
            Self::UserProperty => 24,
        }
    }

    pub fn fallback(self) -> &'static str {
        match self {
            Self::Event => "invalid_event",
            Self::Parameter => "invalid_param",
            Self::UserProperty => "invalid_property",
        }
    }

    /// Prepended when a repaired name does not start with a letter.
    pub fn insertion_prefix(self) -> &'static str {
        match self {
            Self::Event => "event_",
            Self::Parameter => "param_",
            Self::UserProperty => "prop_",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Parameter => "Parameter",
            Self::UserProperty => "User property",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Parameter => "parameter",
            Self::UserProperty => "user property",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameViolation {
    Empty,
    ReservedPrefixOnly(&'static str),
}

impl NameViolation {
    fn message(self, kind: NameKind) -> String {
        match self {
            Self::Empty => format!("Empty {} name", kind.noun()),
            Self::ReservedPrefixOnly(prefix) => {
                format!("Name cannot be only a reserved prefix: {prefix}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairResult {
    Repaired(String),
    Unrecoverable(NameViolation),
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("name grammar pattern must compile")
    })
}

pub fn is_compliant_name(name: &str, kind: NameKind) -> bool {
    name.len() <= kind.max_length()
        && name_pattern().is_match(name)
        && reserved_prefix_of(name).is_none()
}

pub fn validate_name(raw: Option<&str>, kind: NameKind, config: &GrammarConfig) -> ValidationOutcome {
    let name = match raw {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return ValidationOutcome::rejected(
                raw,
                kind.fallback(),
                NameViolation::Empty.message(kind),
            );
        }
    };

    if is_compliant_name(name, kind) {
        return ValidationOutcome::unchanged(Some(name));
    }

    match repair_name(name, kind, config.invalid_character_policy) {
        RepairResult::Repaired(repaired) if repaired == name => {
            ValidationOutcome::unchanged(Some(name))
        }
        RepairResult::Repaired(repaired) => ValidationOutcome::repaired(
            name,
            repaired,
            format!("{} name sanitized", kind.label()),
        ),
        RepairResult::Unrecoverable(violation) => {
            ValidationOutcome::rejected(Some(name), kind.fallback(), violation.message(kind))
        }
    }
}

pub fn validate_event_name(raw: Option<&str>, config: &GrammarConfig) -> ValidationOutcome {
    validate_name(raw, NameKind::Event, config)
}

pub fn validate_parameter_name(raw: Option<&str>, config: &GrammarConfig) -> ValidationOutcome {
    validate_name(raw, NameKind::Parameter, config)
}

pub fn validate_user_property_name(raw: Option<&str>, config: &GrammarConfig) -> ValidationOutcome {
    validate_name(raw, NameKind::UserProperty, config)
}

pub fn repair_name(raw: &str, kind: NameKind, policy: InvalidCharacterPolicy) -> RepairResult {
    let mut body = raw;
    if let Some(prefix) = reserved_prefix_of(body) {
        body = &body[prefix.len()..];
        if body.is_empty() {
            return RepairResult::Unrecoverable(NameViolation::ReservedPrefixOnly(prefix));
        }
    }

    let replaced = replace_invalid_characters(body, policy);
    let mut repaired = collapse_underscores(&replaced);

    // Trimming underscores can surface another reserved prefix (`_ga_x` -> `ga_x`).
    while let Some(prefix) = reserved_prefix_of(&repaired) {
        repaired.replace_range(..prefix.len(), "");
    }

    if !repaired.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
        repaired.insert_str(0, kind.insertion_prefix());
    }

    // Only ASCII survives character repair, so byte truncation is safe.
    repaired.truncate(kind.max_length());

    if repaired.is_empty() {
        let stem = kind.insertion_prefix().trim_end_matches('_');
        repaired = format!("{stem}_fallback");
    }
    RepairResult::Repaired(repaired)
}

fn replace_invalid_characters(value: &str, policy: InvalidCharacterPolicy) -> String {
    value
        .chars()
        .filter_map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                return Some(ch);
            }
            match policy {
                InvalidCharacterPolicy::Replace => Some('_'),
                InvalidCharacterPolicy::Remove => None,
            }
        })
        .collect()
}

fn collapse_underscores(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch);
    }
    out.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        collapse_underscores, is_compliant_name, repair_name, validate_event_name,
        validate_name, validate_parameter_name, validate_user_property_name, NameKind,
        NameViolation, RepairResult,
    };
    use crate::grammar::{GrammarConfig, InvalidCharacterPolicy};

    fn removing() -> GrammarConfig {
        GrammarConfig {
            invalid_character_policy: InvalidCharacterPolicy::Remove,
            ..GrammarConfig::default()
        }
    }

    #[test]
    fn compliant_names_pass_unchanged() {
        let config = GrammarConfig::default();
        let outcome = validate_event_name(Some("add_to_cart"), &config);
        assert!(outcome.accepted);
        assert!(!outcome.was_modified());
        assert_eq!(outcome.resolved_str(), Some("add_to_cart"));
        assert_eq!(outcome.message, "Valid");
    }

    #[test]
    fn punctuation_and_spaces_are_replaced_then_collapsed() {
        let outcome = validate_event_name(Some("my-event name!"), &GrammarConfig::default());
        assert!(outcome.accepted);
        assert!(outcome.was_modified());
        assert_eq!(outcome.resolved_str(), Some("my_event_name"));
        assert_eq!(outcome.message, "Event name sanitized");
    }

    #[test]
    fn remove_policy_deletes_invalid_characters() {
        let outcome = validate_event_name(Some("my-event name!"), &removing());
        assert_eq!(outcome.resolved_str(), Some("myeventname"));
    }

    #[test]
    fn reserved_prefix_only_names_are_rejected() {
        let config = GrammarConfig::default();
        let outcome = validate_event_name(Some("firebase_"), &config);
        assert!(!outcome.accepted);
        assert_eq!(outcome.resolved_str(), Some("invalid_event"));
        assert!(outcome.message.contains("reserved prefix"), "{}", outcome.message);

        let param = validate_parameter_name(Some("GA_"), &config);
        assert!(!param.accepted);
        assert_eq!(param.resolved_str(), Some("invalid_param"));

        let property = validate_user_property_name(Some("google_"), &config);
        assert!(!property.accepted);
        assert_eq!(property.resolved_str(), Some("invalid_property"));
    }

    #[test]
    fn reserved_prefix_is_stripped_case_insensitively_keeping_body_case() {
        let outcome = validate_event_name(Some("Firebase_ScreenView"), &GrammarConfig::default());
        assert!(outcome.accepted);
        assert_eq!(outcome.resolved_str(), Some("ScreenView"));
    }

    #[test]
    fn reserved_prefix_exposed_by_trimming_is_stripped() {
        let outcome = validate_event_name(Some("_ga_campaign"), &GrammarConfig::default());
        assert_eq!(outcome.resolved_str(), Some("campaign"));

        let nested = validate_event_name(Some("firebase_google_x"), &GrammarConfig::default());
        assert_eq!(nested.resolved_str(), Some("x"));
    }

    #[test]
    fn empty_and_blank_names_fall_back() {
        let config = GrammarConfig::default();
        let missing = validate_event_name(None, &config);
        assert!(!missing.accepted);
        assert!(missing.original.is_none());
        assert_eq!(missing.resolved_str(), Some("invalid_event"));
        assert_eq!(missing.message, "Empty event name");

        let blank = validate_user_property_name(Some("   "), &config);
        assert!(!blank.accepted);
        assert_eq!(blank.original.as_deref(), Some("   "));
        assert_eq!(blank.resolved_str(), Some("invalid_property"));
        assert_eq!(blank.message, "Empty user property name");
    }

    #[test]
    fn names_not_starting_with_a_letter_get_insertion_prefix() {
        let config = GrammarConfig::default();
        assert_eq!(
            validate_event_name(Some("1st_visit"), &config).resolved_str(),
            Some("event_1st_visit")
        );
        assert_eq!(
            validate_parameter_name(Some("9lives"), &config).resolved_str(),
            Some("param_9lives")
        );
        assert_eq!(
            validate_user_property_name(Some("42"), &config).resolved_str(),
            Some("prop_42")
        );
    }

    #[test]
    fn names_without_usable_characters_become_bare_prefix() {
        let outcome = validate_event_name(Some("!!!"), &removing());
        assert!(outcome.accepted);
        assert_eq!(outcome.resolved_str(), Some("event_"));
    }

    #[test]
    fn long_user_property_names_are_truncated() {
        let outcome = validate_user_property_name(
            Some("this_is_very_long_user_property_name"),
            &GrammarConfig::default(),
        );
        assert!(outcome.accepted);
        assert!(outcome.was_modified());
        assert_eq!(outcome.resolved_str(), Some("this_is_very_long_user_p"));
        assert_eq!(outcome.message, "User property name sanitized");
    }

    #[test]
    fn long_event_names_are_truncated_after_prefix_insertion() {
        let raw = format!("9{}", "a".repeat(60));
        let outcome = validate_event_name(Some(&raw), &GrammarConfig::default());
        let resolved = outcome.resolved_str().expect("resolved name");
        assert_eq!(resolved.len(), 40);
        assert!(resolved.starts_with("event_9a"));
    }

    #[test]
    fn non_ascii_letters_are_treated_as_invalid_characters() {
        let outcome = validate_parameter_name(Some("café_menü"), &GrammarConfig::default());
        assert_eq!(outcome.resolved_str(), Some("caf_men"));
    }

    #[test]
    fn repair_reports_unrecoverable_reserved_prefix() {
        assert_eq!(
            repair_name("ga_", NameKind::Event, InvalidCharacterPolicy::Replace),
            RepairResult::Unrecoverable(NameViolation::ReservedPrefixOnly("ga_"))
        );
    }

    #[test]
    fn compliance_check_applies_length_and_prefix_rules() {
        assert!(is_compliant_name("screen_view", NameKind::Event));
        assert!(!is_compliant_name("google_thing", NameKind::Event));
        assert!(!is_compliant_name("_leading", NameKind::Parameter));
        assert!(!is_compliant_name(&"a".repeat(25), NameKind::UserProperty));
        assert!(is_compliant_name(&"a".repeat(24), NameKind::UserProperty));
    }

    #[test]
    fn underscore_runs_collapse_and_edges_trim() {
        assert_eq!(collapse_underscores("__a___b__"), "a_b");
        assert_eq!(collapse_underscores("___"), "");
    }

    #[test]
    fn validation_is_idempotent_on_repaired_names() {
        let config = GrammarConfig::default();
        for raw in ["my-event name!", "_ga_x", "123", "Firebase_A b", "ü"] {
            let first = validate_name(Some(raw), NameKind::Event, &config);
            let resolved = first.resolved_str().expect("resolved");
            let second = validate_name(Some(resolved), NameKind::Event, &config);
            assert_eq!(second.resolved_str(), Some(resolved), "{raw}");
            assert!(!second.was_modified(), "{raw}");
        }
    }
}
