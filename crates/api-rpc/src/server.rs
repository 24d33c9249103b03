//! JSON-RPC Server
//!
//! JSON-RPC 2.0 over HTTP on localhost.

use crate::handler::RpcHandler;
use crate::rate_limiter::RateLimiter;
use crate::types::AddRequest;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use timemachine_core::error::{AppError, Result};
use timemachine_core::port::MessageQueue;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9527;
const DEFAULT_RATE_LIMIT_BURST: u32 = 20;
const DEFAULT_RATE_LIMIT_PER_SEC: u32 = 5;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit_burst: u32,
    pub rate_limit_per_sec: u32,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            rate_limit_per_sec: DEFAULT_RATE_LIMIT_PER_SEC,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, queue: Arc<dyn MessageQueue>) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_burst,
            config.rate_limit_per_sec,
        ));
        Self {
            handler: Arc::new(RpcHandler::new(queue, rate_limiter)),
            config,
        }
    }

    /// Bind and start serving; returns the bound address and the stop handle
    ///
    /// Port 0 binds an ephemeral port (tests).
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle)> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| AppError::Internal(format!("failed to bind RPC server on {}: {}", addr, e)))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| AppError::Internal(format!("failed to read RPC address: {}", e)))?;

        let module = self.into_module()?;
        let handle = server.start(module);

        info!(addr = %local_addr, "JSON-RPC server started");
        Ok((local_addr, handle))
    }

    fn into_module(self) -> Result<RpcModule<()>> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("queue.add.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: AddRequest = params.parse()?;
                    handler.add(req).await
                }
            })
            .map_err(register_error)?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.list.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.list().await }
            })
            .map_err(register_error)?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(register_error)?;

        Ok(module)
    }
}

fn register_error(e: jsonrpsee::core::RegisterMethodError) -> AppError {
    AppError::Internal(e.to_string())
}
