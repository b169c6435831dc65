use crate::diagnostics::LogLevel;
use crate::value_model::FieldSet;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsConfiguration {
    pub session_timeout_seconds: Option<f64>,
    pub minimum_session_seconds: Option<f64>,
    pub analytics_enabled: Option<bool>,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConversionIdentifier {
    HashedEmail(String),
    HashedPhone(String),
    Email(String),
    Phone(String),
}

/// One call made against the analytics SDK.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SinkCall {
    Configure(AnalyticsConfiguration),
    LogEvent {
        name: String,
        params: FieldSet,
    },
    SetScreenName {
        name: String,
        class: Option<String>,
    },
    SetUserProperty {
        name: String,
        value: Option<String>,
    },
    SetUserId {
        id: String,
    },
    SetDefaultParameters {
        params: Option<FieldSet>,
    },
    SetConsent {
        settings: FieldSet,
    },
    ResetAnalyticsData,
    InitiateConversionMeasurement {
        identifier: ConversionIdentifier,
    },
}

/// The analytics SDK surface the dispatcher drives.
///
/// Every method has a default that forwards a [`SinkCall`] to [`AnalyticsSink::record`],
/// so adapters only override the calls they bind natively.
pub trait AnalyticsSink {
    fn record(&mut self, call: SinkCall);

    fn configure(&mut self, configuration: &AnalyticsConfiguration) {
        self.record(SinkCall::Configure(configuration.clone()));
    }

    fn log_event(&mut self, name: &str, params: &FieldSet) {
        self.record(SinkCall::LogEvent {
            name: name.to_string(),
            params: params.clone(),
        });
    }

    fn set_screen_name(&mut self, name: &str, class: Option<&str>) {
        self.record(SinkCall::SetScreenName {
            name: name.to_string(),
            class: class.map(str::to_string),
        });
    }

    fn set_user_property(&mut self, name: &str, value: Option<&str>) {
        self.record(SinkCall::SetUserProperty {
            name: name.to_string(),
            value: value.map(str::to_string),
        });
    }

    fn set_user_id(&mut self, id: &str) {
        self.record(SinkCall::SetUserId { id: id.to_string() });
    }

    fn set_default_parameters(&mut self, params: Option<&FieldSet>) {
        self.record(SinkCall::SetDefaultParameters {
            params: params.cloned(),
        });
    }

    fn set_consent(&mut self, settings: &FieldSet) {
        self.record(SinkCall::SetConsent {
            settings: settings.clone(),
        });
    }

    fn reset_analytics_data(&mut self) {
        self.record(SinkCall::ResetAnalyticsData);
    }

    fn initiate_conversion_measurement(&mut self, identifier: &ConversionIdentifier) {
        self.record(SinkCall::InitiateConversionMeasurement {
            identifier: identifier.clone(),
        });
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<SinkCall> {
        std::mem::take(&mut self.calls)
    }
}

impl AnalyticsSink for RecordingSink {
    fn record(&mut self, call: SinkCall) {
        self.calls.push(call);
    }
}

/// Writes each call as one JSON object per line.
///
/// The first write failure is kept and surfaced by [`JsonLinesSink::finish`];
/// later calls are dropped.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    failure: Option<io::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failure: None,
        }
    }

    fn write_call(&mut self, call: &SinkCall) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, call)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> AnalyticsSink for JsonLinesSink<W> {
    fn record(&mut self, call: SinkCall) {
        if self.failure.is_some() {
            return;
        }
        if let Err(err) = self.write_call(&call) {
            self.failure = Some(err);
        }
    }
}
