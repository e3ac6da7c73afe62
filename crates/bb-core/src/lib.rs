//! Shared primitives used across BuildingBlock crates.

use thiserror::Error;

/// Result alias used across the workspace.
pub type BlockResult<T> = Result<T, BlockError>;

/// Error raised by the host document or by descriptor expansion.
///
/// `code` is a stable dotted identifier (`descriptor.malformed_json`,
/// `dom.unknown_node`, ...) callers can match on; `message` is for humans.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct BlockError {
    pub code: &'static str,
    pub message: String,
}

impl BlockError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}
