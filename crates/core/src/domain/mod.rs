// Domain Layer - Pure business logic and value objects

pub mod error;
pub mod message;
pub mod schedule;

// Re-exports
pub use error::{DomainError, ScheduleError};
pub use message::Message;
pub use schedule::{CronSchedule, DEFAULT_CRON_EXPRESSION, DEFAULT_TIMEZONE};
