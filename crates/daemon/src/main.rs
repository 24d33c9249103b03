//! Time Machine - Main Entry Point
//!
//! Loads configuration, opens the message queue, starts the producer API and
//! the delivery scheduler, and runs until Ctrl+C.

mod config;
mod logging;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use config::Config;
use timemachine_api_rpc::RpcServer;
use timemachine_core::application::{Dispatcher, Scheduler};
use timemachine_core::port::time_provider::SystemTimeProvider;
use timemachine_core::port::MessageQueue;
use timemachine_infra_json::JsonFileQueue;
use timemachine_infra_smtp::SmtpDelivery;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (.env is optional)
    let dotenv = dotenvy::dotenv();
    let config = Config::from_env().context("Invalid configuration")?;

    // 2. Initialize logging
    logging::init(config.log_format).context("Failed to initialize logging")?;

    info!("Time Machine v{} starting...", VERSION);
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }
    info!(
        smtp = ?config.smtp,
        messages_file = %config.messages_file.display(),
        schedule = %config.schedule,
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let queue = Arc::new(
        JsonFileQueue::open(&config.messages_file)
            .await
            .context("Failed to initialize message queue")?,
    );
    info!(pending = queue.len().await, "Message queue ready");

    let delivery = Arc::new(SmtpDelivery::new(config.smtp).context("Invalid SMTP configuration")?);
    let dispatcher = Arc::new(Dispatcher::new(queue.clone(), delivery));

    // 4. Start JSON-RPC server
    let (rpc_addr, rpc_handle) = RpcServer::new(config.rpc, queue.clone())
        .start()
        .await
        .context("RPC server start failed")?;
    info!(addr = %rpc_addr, "Producer API listening");

    // 5. Start scheduler (fires once immediately)
    let scheduler = Scheduler::new(dispatcher, config.schedule, Arc::new(SystemTimeProvider));
    info!(schedule = %scheduler.schedule(), "Delivery schedule configured");
    let scheduler_handle = scheduler.start();

    info!("System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    scheduler_handle.stop().await;
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
