use crate::command::{split_command_tokens, Command};
use crate::diagnostics::{Diagnostics, LogLevel};
use crate::error::{CommandError, CommandResult};
use crate::field_set::sanitize_field_set;
use crate::grammar::{GrammarConfig, InvalidCharacterPolicy};
use crate::item_list::transpose;
use crate::name_mapping::{map_event_name, map_parameter_names};
use crate::name_validation::{validate_name, NameKind};
use crate::payload_keys as keys;
use crate::sink::{AnalyticsConfiguration, AnalyticsSink, ConversionIdentifier};
use crate::value_model::{bool_of, f64_of, field_object, field_text, text_of, FieldSet};
use crate::value_validation::validate_user_property_value;
use serde_json::Value;

pub const DEFAULT_COMMAND_SEPARATOR: char = ',';

/// What one payload did: commands that reached the sink and those abandoned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub executed: Vec<Command>,
    pub failures: Vec<CommandError>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Routes decoded remote-command payloads to an [`AnalyticsSink`].
///
/// Grammar toggles and the diagnostic level live here and are passed into every
/// validation call. Payloads must be dispatched one at a time.
pub struct Dispatcher<S: AnalyticsSink> {
    sink: S,
    grammar: GrammarConfig,
    diagnostics: Diagnostics,
    separator: char,
}

impl<S: AnalyticsSink> Dispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            grammar: GrammarConfig::default(),
            diagnostics: Diagnostics::default(),
            separator: DEFAULT_COMMAND_SEPARATOR,
        }
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.diagnostics.set_level(level);
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn grammar(&self) -> &GrammarConfig {
        &self.grammar
    }

    pub fn log_level(&self) -> LogLevel {
        self.diagnostics.level()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn dispatch(&mut self, payload: &FieldSet) -> DispatchReport {
        let mut report = DispatchReport::default();
        let Some(command_field) = field_text(payload, keys::COMMAND_NAME) else {
            self.fail(&mut report, CommandError::MissingCommandName);
            return report;
        };

        let commands: Vec<Result<Command, String>> =
            split_command_tokens(&command_field, self.separator)
                .into_iter()
                .map(|token| Command::parse(&token).ok_or(token))
                .collect();

        // Config settings affect how every other command in this payload validates.
        if commands.contains(&Ok(Command::Config)) {
            self.apply_bridge_settings(payload);
        }

        for command in commands {
            let result = match command {
                Ok(command) => self.run(command, payload).map(|()| command),
                Err(token) => Err(CommandError::UnknownCommand(token)),
            };
            match result {
                Ok(command) => report.executed.push(command),
                Err(err) => self.fail(&mut report, err),
            }
        }
        report
    }

    fn fail(&self, report: &mut DispatchReport, err: CommandError) {
        self.diagnostics.command_failed(&err);
        report.failures.push(err);
    }

    fn run(&mut self, command: Command, payload: &FieldSet) -> CommandResult {
        match command {
            Command::Config => self.configure(payload),
            Command::LogEvent => self.log_event(payload),
            Command::SetScreenName => self.set_screen_name(payload),
            Command::SetUserProperty => self.set_user_property(payload),
            Command::SetUserId => self.set_user_id(payload),
            Command::SetDefaultParameters => self.set_default_parameters(payload),
            Command::SetConsent => self.set_consent(payload),
            Command::ResetAnalyticsData => {
                self.sink.reset_analytics_data();
                Ok(())
            }
            Command::InitiateConversionMeasurement => {
                self.initiate_conversion_measurement(payload)
            }
        }
    }

    fn apply_bridge_settings(&mut self, payload: &FieldSet) {
        if let Some(value) = payload.get(keys::LOG_LEVEL) {
            match text_of(value).as_deref().and_then(LogLevel::parse) {
                Some(level) => self.diagnostics.set_level(level),
                None => self
                    .diagnostics
                    .warning(&format!("config: ignoring unrecognized log level {value}")),
            }
        }
        if let Some(value) = payload.get(keys::INVALID_CHARACTER_POLICY) {
            match text_of(value)
                .as_deref()
                .and_then(InvalidCharacterPolicy::parse)
            {
                Some(policy) => self.grammar.invalid_character_policy = policy,
                None => self.diagnostics.warning(&format!(
                    "config: ignoring unrecognized invalid character policy {value}"
                )),
            }
        }
        if let Some(value) = payload.get(keys::EXTENDED_VALUE_LENGTH) {
            match bool_of(value) {
                Some(enabled) => self.grammar.extended_value_length = enabled,
                None => self.diagnostics.warning(&format!(
                    "config: ignoring non-boolean extended value length {value}"
                )),
            }
        }
    }

    fn configure(&mut self, payload: &FieldSet) -> CommandResult {
        let configuration = AnalyticsConfiguration {
            session_timeout_seconds: payload.get(keys::SESSION_TIMEOUT_SECONDS).and_then(f64_of),
            minimum_session_seconds: payload.get(keys::SESSION_MINIMUM_SECONDS).and_then(f64_of),
            analytics_enabled: payload.get(keys::ANALYTICS_ENABLED).and_then(bool_of),
            log_level: self.diagnostics.level(),
        };
        self.sink.configure(&configuration);
        Ok(())
    }

    fn checked_name(
        &self,
        command: Command,
        kind: NameKind,
        raw: Option<&str>,
    ) -> CommandResult<String> {
        let outcome = validate_name(raw, kind, &self.grammar);
        if !outcome.accepted {
            return Err(CommandError::RejectedName {
                command,
                name: outcome.original.unwrap_or_default(),
                reason: outcome.message,
            });
        }
        self.diagnostics.outcome(command.token(), &outcome);
        Ok(outcome.resolved.unwrap_or_else(|| kind.fallback().to_string()))
    }

    fn log_event(&mut self, payload: &FieldSet) -> CommandResult {
        let raw_name = field_text(payload, keys::EVENT_NAME).ok_or(
            CommandError::MissingRequiredField {
                command: Command::LogEvent,
                field: keys::EVENT_NAME,
            },
        )?;
        let event_name = self.checked_name(
            Command::LogEvent,
            NameKind::Event,
            Some(map_event_name(&raw_name)),
        )?;

        let mut params = map_parameter_names(&self.collect_event_params(payload));
        let items = params
            .remove(keys::ITEMS)
            .or_else(|| payload.get(keys::ITEMS).cloned());

        let sanitized = sanitize_field_set(&params, &self.grammar);
        self.diagnostics
            .sanitized_fields(Command::LogEvent.token(), &sanitized);
        let mut params = sanitized.fields;

        if let Some(items) = items {
            match self.sanitize_items(&items) {
                Some(records) => {
                    let records = records.into_iter().map(Value::Object).collect();
                    params.insert(keys::ITEMS.to_string(), Value::Array(records));
                }
                None => self.diagnostics.warning(&format!(
                    "{}: ignoring `{}` that is neither a list nor an object",
                    Command::LogEvent,
                    keys::ITEMS
                )),
            }
        }

        self.sink.log_event(&event_name, &params);
        Ok(())
    }

    fn collect_event_params(&self, payload: &FieldSet) -> FieldSet {
        let mut params: FieldSet = payload
            .iter()
            .filter(|(key, _)| key.starts_with(keys::DIRECT_PARAMETER_PREFIX))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if let Some(nested) = field_object(payload, keys::EVENT_PARAMS) {
            params.extend(nested.iter().map(|(key, value)| (key.clone(), value.clone())));
        } else if let Some(other) = payload.get(keys::EVENT_PARAMS).filter(|v| !v.is_null()) {
            self.diagnostics.warning(&format!(
                "{}: ignoring non-object `{}`: {other}",
                Command::LogEvent,
                keys::EVENT_PARAMS
            ));
        }
        params
    }

    /// Item lists arrive either as item objects or as an object of parallel arrays.
    fn sanitize_items(&self, items: &Value) -> Option<Vec<FieldSet>> {
        let records: Vec<FieldSet> = match items {
            Value::Array(entries) => entries
                .iter()
                .filter_map(Value::as_object)
                .map(map_parameter_names)
                .collect(),
            Value::Object(columns) => transpose(&map_parameter_names(columns)),
            _ => return None,
        };

        let context = format!("{} {}", Command::LogEvent, keys::ITEMS);
        let sanitized = records
            .iter()
            .map(|record| {
                let sanitized = sanitize_field_set(record, &self.grammar);
                self.diagnostics.sanitized_fields(&context, &sanitized);
                sanitized.fields
            })
            .filter(|record| !record.is_empty())
            .collect();
        Some(sanitized)
    }

    fn set_screen_name(&mut self, payload: &FieldSet) -> CommandResult {
        let screen_name = field_text(payload, keys::SCREEN_NAME).ok_or(
            CommandError::MissingRequiredField {
                command: Command::SetScreenName,
                field: keys::SCREEN_NAME,
            },
        )?;
        let screen_class = field_text(payload, keys::SCREEN_CLASS);
        self.sink
            .set_screen_name(&screen_name, screen_class.as_deref());
        Ok(())
    }

    fn set_user_property(&mut self, payload: &FieldSet) -> CommandResult {
        let command = Command::SetUserProperty;
        let names = payload
            .get(keys::PROPERTY_NAME)
            .ok_or(CommandError::MissingRequiredField {
                command,
                field: keys::PROPERTY_NAME,
            })?;
        let values = payload
            .get(keys::PROPERTY_VALUE)
            .ok_or(CommandError::MissingRequiredField {
                command,
                field: keys::PROPERTY_VALUE,
            })?;

        let pairs: Vec<(&Value, &Value)> = match (names, values) {
            (Value::Array(names), Value::Array(values)) => names.iter().zip(values).collect(),
            (Value::Array(_), _) => {
                return Err(CommandError::MalformedField {
                    command,
                    field: keys::PROPERTY_VALUE,
                    expected: "a list when `property_name` is a list",
                });
            }
            (_, Value::Array(_)) => {
                return Err(CommandError::MalformedField {
                    command,
                    field: keys::PROPERTY_NAME,
                    expected: "a list when `property_value` is a list",
                });
            }
            (name, value) => vec![(name, value)],
        };

        for (name, value) in pairs {
            if let Err(err) = self.apply_user_property(name, value) {
                self.diagnostics.command_failed(&err);
            }
        }
        Ok(())
    }

    fn apply_user_property(&mut self, name: &Value, value: &Value) -> CommandResult {
        let command = Command::SetUserProperty;
        let raw_name = text_of(name);
        let property_name =
            self.checked_name(command, NameKind::UserProperty, raw_name.as_deref())?;

        let raw_value = match value {
            Value::Null => None,
            scalar => Some(text_of(scalar).ok_or(CommandError::MalformedField {
                command,
                field: keys::PROPERTY_VALUE,
                expected: "text, a number, a boolean or null",
            })?),
        };
        let outcome = validate_user_property_value(raw_value.as_deref(), &self.grammar);
        self.diagnostics.outcome(command.token(), &outcome);
        self.sink
            .set_user_property(&property_name, outcome.resolved.as_deref());
        Ok(())
    }

    fn set_user_id(&mut self, payload: &FieldSet) -> CommandResult {
        let user_id = field_text(payload, keys::USER_ID).ok_or(
            CommandError::MissingRequiredField {
                command: Command::SetUserId,
                field: keys::USER_ID,
            },
        )?;
        self.sink.set_user_id(&user_id);
        Ok(())
    }

    fn set_default_parameters(&mut self, payload: &FieldSet) -> CommandResult {
        let params = payload
            .get(keys::DEFAULT_PARAMS)
            .filter(|v| !v.is_null())
            .or_else(|| payload.get(keys::DEFAULT_PARAMS_FALLBACK));
        match params {
            None | Some(Value::Null) => self.sink.set_default_parameters(None),
            Some(Value::Object(params)) if params.is_empty() => {
                self.sink.set_default_parameters(Some(params))
            }
            Some(Value::Object(params)) => {
                let sanitized = sanitize_field_set(params, &self.grammar);
                self.diagnostics
                    .sanitized_fields(Command::SetDefaultParameters.token(), &sanitized);
                self.sink.set_default_parameters(Some(&sanitized.fields));
            }
            Some(_) => {
                return Err(CommandError::MalformedField {
                    command: Command::SetDefaultParameters,
                    field: keys::DEFAULT_PARAMS,
                    expected: "an object",
                });
            }
        }
        Ok(())
    }

    fn set_consent(&mut self, payload: &FieldSet) -> CommandResult {
        let command = Command::SetConsent;
        if let Some(settings) = field_object(payload, keys::CONSENT_SETTINGS) {
            self.sink.set_consent(settings);
            return Ok(());
        }
        match payload.get(keys::CONSENT_SETTINGS) {
            None | Some(Value::Null) => Err(CommandError::MissingRequiredField {
                command,
                field: keys::CONSENT_SETTINGS,
            }),
            Some(_) => Err(CommandError::MalformedField {
                command,
                field: keys::CONSENT_SETTINGS,
                expected: "an object",
            }),
        }
    }

    fn initiate_conversion_measurement(&mut self, payload: &FieldSet) -> CommandResult {
        let identifier = keys::CONVERSION_IDENTIFIER_FIELDS
            .into_iter()
            .find_map(|field| {
                let text = field_text(payload, field).filter(|text| !text.trim().is_empty())?;
                Some(match field {
                    keys::HASHED_EMAIL_ADDRESS => ConversionIdentifier::HashedEmail(text),
                    keys::HASHED_PHONE_NUMBER => ConversionIdentifier::HashedPhone(text),
                    keys::EMAIL_ADDRESS => ConversionIdentifier::Email(text),
                    _ => ConversionIdentifier::Phone(text),
                })
            })
            .ok_or(CommandError::MissingRequiredField {
                command: Command::InitiateConversionMeasurement,
                field: keys::EMAIL_ADDRESS,
            })?;
        self.sink.initiate_conversion_measurement(&identifier);
        Ok(())
    }
}
