//! Test error types.

use thiserror::Error;
use waypost_core::LogicFault;

/// Errors that can occur while driving a dispatcher in a test.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request could not be built.
    #[error("Request build error: {0}")]
    RequestBuild(String),

    /// The response body could not be read as requested.
    #[error("Body read error: {0}")]
    BodyRead(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint logic faulted; the fault escaped dispatch.
    #[error("Logic fault: {0}")]
    Fault(LogicFault),
}
