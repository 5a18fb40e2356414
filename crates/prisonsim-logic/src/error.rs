//! Error type shared by every prisonsim operation.

use thiserror::Error;

/// Errors raised while building boards or running experiments.
///
/// All of them are input validation failures; nothing in the simulation
/// can fail transiently, so there is nothing to retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A parameter was outside its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
