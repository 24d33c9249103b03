// Application Layer - Use Cases and Business Logic

pub mod dispatcher;
pub mod scheduler;
mod shutdown;
pub mod submit;

// Re-exports
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
