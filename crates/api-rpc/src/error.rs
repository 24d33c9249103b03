//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use timemachine_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const THROTTLED: i32 = 4003;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const STORAGE_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = match &err {
        AppError::Domain(_) => code::VALIDATION_ERROR,
        AppError::Storage(_) | AppError::Io(_) | AppError::Serialization(_) => {
            code::STORAGE_ERROR
        }
        AppError::Config(_)
        | AppError::Delivery(_)
        | AppError::Schedule(_)
        | AppError::Internal(_) => code::INTERNAL_ERROR,
    };
    let message = match err {
        AppError::Domain(e) => e.to_string(),
        AppError::Storage(msg) | AppError::Internal(msg) => msg,
        other => other.to_string(),
    };
    ErrorObjectOwned::owned(code, message, None::<()>)
}

pub fn throttled() -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        code::THROTTLED,
        "Rate limit exceeded. Please slow down.",
        None::<()>,
    )
}
