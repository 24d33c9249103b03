//! RPC Method Handlers

use crate::error::{throttled, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{AddRequest, AddResponse, ListResponse, StatsResponse};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use std::time::Instant;
use timemachine_core::application::submit;
use timemachine_core::port::MessageQueue;
use tracing::warn;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    queue: Arc<dyn MessageQueue>,
    rate_limiter: Arc<RateLimiter>,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(queue: Arc<dyn MessageQueue>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            queue,
            rate_limiter,
            start_time: Instant::now(),
        }
    }

    /// queue.add.v1
    pub async fn add(&self, params: AddRequest) -> Result<AddResponse, ErrorObjectOwned> {
        if !self.rate_limiter.try_acquire() {
            warn!("queue.add.v1 throttled");
            return Err(throttled());
        }

        let queue_length = submit::execute(self.queue.as_ref(), params.message)
            .await
            .map_err(to_rpc_error)?;

        Ok(AddResponse { queue_length })
    }

    /// queue.list.v1
    pub async fn list(&self) -> Result<ListResponse, ErrorObjectOwned> {
        let messages: Vec<String> = self
            .queue
            .snapshot()
            .await
            .into_iter()
            .map(|m| m.into_inner())
            .collect();

        Ok(ListResponse {
            count: messages.len(),
            messages,
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        Ok(StatsResponse {
            queue_length: self.queue.len().await,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}
