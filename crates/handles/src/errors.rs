//! Error types for the handle bridge.

use thiserror::Error;

use refbridge_errors::BridgeError;

use crate::types::TypeTag;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("invalid handle: identity {identity} is null, unknown, or no longer live")]
    InvalidHandle { identity: u64 },

    #[error("handle type mismatch: expected tag {expected:?}, got {actual:?}")]
    TypeMismatch { expected: TypeTag, actual: TypeTag },

    #[error("double release of handle identity {identity}")]
    DoubleRelease { identity: u64 },
}

/// Registry misuse crosses the boundary as an input validation failure with
/// the specific condition named in the message.
impl From<HandleError> for BridgeError {
    fn from(err: HandleError) -> Self {
        BridgeError::InputValidation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HandleError>;
