use crate::command::Command;
use thiserror::Error;

/// Reasons a single sub-command was abandoned. Sibling sub-commands still run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{command}: missing required field `{field}`")]
    MissingRequiredField {
        command: Command,
        field: &'static str,
    },

    #[error("{command}: field `{field}` must be {expected}")]
    MalformedField {
        command: Command,
        field: &'static str,
        expected: &'static str,
    },

    #[error("{command}: rejected name `{name}`: {reason}")]
    RejectedName {
        command: Command,
        name: String,
        reason: String,
    },

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("payload has no `command_name`")]
    MissingCommandName,
}

pub type CommandResult<T = ()> = std::result::Result<T, CommandError>;
