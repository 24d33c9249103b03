//! JSON-RPC API Layer
//!
//! Producer-facing JSON-RPC 2.0 server for Time Machine: adds messages to the
//! queue and reports on it. Binds to localhost only.

pub mod error;
pub mod handler;
mod rate_limiter;
pub mod server;
pub mod types;

pub use rate_limiter::{RateLimiter, MAX_BURST};
pub use server::{RpcServer, RpcServerConfig};
