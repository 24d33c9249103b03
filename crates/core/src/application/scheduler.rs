//! Scheduler - Fires the dispatcher on a cron schedule
//!
//! One fire happens immediately when the scheduler starts, independent of
//! the schedule. After that the dispatcher runs at every instant matched by
//! the cron expression in the schedule's timezone, until shutdown.
//!
//! Fires are sequential: a dispatch that is in flight completes before the
//! next wait begins, and shutdown only interrupts the wait.

use super::dispatcher::{DispatchOutcome, Dispatcher};
use super::shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
use crate::domain::{CronSchedule, ScheduleError};
use crate::error::Result;
use crate::port::TimeProvider;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Scheduler owns the timing loop around one dispatcher
pub struct Scheduler {
    dispatcher: Arc<Dispatcher>,
    schedule: CronSchedule,
    time_provider: Arc<dyn TimeProvider>,
}

impl Scheduler {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        schedule: CronSchedule,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            dispatcher,
            schedule,
            time_provider,
        }
    }

    pub fn schedule(&self) -> &CronSchedule {
        &self.schedule
    }

    /// Spawn the loop on the current tokio runtime
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        let task = tokio::spawn(async move {
            if let Err(e) = self.run(shutdown_rx).await {
                error!(error = %e, "Scheduler stopped with error");
            }
        });
        SchedulerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    /// Run the loop until `shutdown` is signalled
    ///
    /// # Errors
    /// Returns `ScheduleError::NeverFires` if the schedule runs out of
    /// instants, which a successfully parsed schedule never does in practice.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!(schedule = %self.schedule, "Scheduler started, sending first message immediately");
        self.fire().await;

        // Never schedule at or before an instant that already fired, even if
        // the wall clock lags the timer slightly on wake-up.
        let mut cursor = self.time_provider.now();

        loop {
            if shutdown.is_shutdown() {
                info!("Scheduler shutting down");
                break;
            }

            let now = self.time_provider.now();
            let after = now.max(cursor);
            let next = self
                .schedule
                .next_after(after)
                .ok_or_else(|| ScheduleError::NeverFires(self.schedule.expression().to_string()))?;
            let wait = (next - now).to_std().unwrap_or_default();

            info!(
                next_fire = %next.with_timezone(&self.schedule.timezone()),
                wait_secs = wait.as_secs(),
                "Waiting for next scheduled dispatch"
            );

            tokio::select! {
                _ = sleep(wait) => {},
                _ = shutdown.wait() => {
                    info!("Scheduler interrupted while waiting");
                    break;
                }
            }

            cursor = next;
            self.fire().await;
        }

        info!("Scheduler stopped");
        Ok(())
    }

    async fn fire(&self) {
        let outcome = self.dispatcher.run_once().await;
        debug!(outcome = outcome_label(&outcome), "Dispatch cycle finished");
    }
}

fn outcome_label(outcome: &DispatchOutcome) -> &'static str {
    match outcome {
        DispatchOutcome::Idle => "idle",
        DispatchOutcome::PopFailed => "pop_failed",
        DispatchOutcome::Delivered(_) => "delivered",
        DispatchOutcome::Requeued(_) => "requeued",
        DispatchOutcome::Lost(_) => "lost",
    }
}

/// Handle to a running scheduler task
pub struct SchedulerHandle {
    shutdown: ShutdownSender,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal shutdown and wait for the loop to exit
    pub async fn stop(self) {
        self.shutdown.shutdown();
        if let Err(e) = self.task.await {
            error!(error = ?e, "Scheduler task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
