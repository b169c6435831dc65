use crate::grammar::GrammarConfig;
use crate::name_validation::validate_parameter_name;
use crate::outcome::ValidationOutcome;
use crate::value_model::FieldSet;
use crate::value_validation::validate_parameter_value;
use serde_json::Value;

/// What happened to one key/value pair that did not pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    pub key: ValidationOutcome,
    pub value: Option<ValidationOutcome>,
}

impl FieldReport {
    pub fn dropped(&self) -> bool {
        !self.key.accepted
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizedFields {
    pub fields: FieldSet,
    pub reports: Vec<FieldReport>,
}

pub fn sanitize_field_set(fields: &FieldSet, config: &GrammarConfig) -> SanitizedFields {
    let mut out = SanitizedFields::default();
    for (key, value) in fields {
        let key_outcome = validate_parameter_name(Some(key.as_str()), config);
        if !key_outcome.accepted {
            out.reports.push(FieldReport {
                key: key_outcome,
                value: None,
            });
            continue;
        }

        let (value, value_outcome) = match value {
            Value::String(text) => {
                let outcome = validate_parameter_value(Some(text.as_str()), config);
                let resolved = outcome
                    .resolved
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null);
                (resolved, Some(outcome))
            }
            other => (other.clone(), None),
        };

        let value_modified = value_outcome
            .as_ref()
            .is_some_and(ValidationOutcome::was_modified);
        let resolved_key = key_outcome
            .resolved
            .clone()
            .unwrap_or_else(|| key.clone());
        if key_outcome.was_modified() || value_modified {
            out.reports.push(FieldReport {
                key: key_outcome,
                value: value_outcome.filter(ValidationOutcome::was_modified),
            });
        }
        out.fields.insert(resolved_key, value);
    }
    out
}
