// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("queue is empty")]
    EmptyQueue,

    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

/// Errors raised while parsing or evaluating a cron schedule
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("invalid {field} field '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("cron expression '{0}' never fires")]
    NeverFires(String),
}
