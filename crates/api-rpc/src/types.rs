//! RPC Request/Response Types

use serde::{Deserialize, Serialize};

/// queue.add.v1 - Append a message to the tail
#[derive(Debug, Serialize, Deserialize)]
pub struct AddRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddResponse {
    pub queue_length: usize,
}

/// queue.list.v1 - Pending messages, head first (no parameters)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub messages: Vec<String>,
    pub count: usize,
}

/// admin.stats.v1 - Daemon statistics (no parameters)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub queue_length: usize,
    pub uptime_seconds: u64,
}
