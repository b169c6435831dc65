//! Bridges tag-management remote commands to an analytics SDK, repairing or
//! rejecting names and values that break the SDK's naming grammar before any
//! call is made.

pub mod command;
pub mod diagnostics;
pub mod dispatcher;
pub mod env_util;
pub mod error;
pub mod field_set;
pub mod grammar;
pub mod item_list;
pub mod name_mapping;
pub mod name_validation;
pub mod outcome;
pub mod payload_keys;
pub mod settings;
pub mod sink;
pub mod value_model;
pub mod value_validation;

#[cfg(test)]
mod test_support;

pub use dispatcher::{DispatchReport, Dispatcher};
pub use grammar::{GrammarConfig, InvalidCharacterPolicy};
pub use outcome::ValidationOutcome;
pub use sink::{AnalyticsSink, SinkCall};
pub use value_model::FieldSet;
