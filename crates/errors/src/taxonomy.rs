//! Canonical error kinds and the structured detail that crosses the boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flat, mutually exclusive error taxonomy.
///
/// Serialized form matches the class name the foreign runtime uses, so the
/// wire shape and the conversion table agree on identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "InputValidationError")]
    InputValidation,
    #[serde(rename = "ConfigurationError")]
    Configuration,
    #[serde(rename = "NotImplementedError")]
    NotImplemented,
    #[serde(rename = "BatchElementError")]
    BatchElement,
    #[serde(rename = "UnhandledError")]
    Unhandled,
}

impl ErrorKind {
    /// Whether this kind is tied to exactly one batch index.
    pub fn is_per_element(self) -> bool {
        matches!(self, ErrorKind::BatchElement)
    }
}

/// Sub-codes carried by per-element failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementErrorCode {
    Unknown,
    InvalidReference,
    MalformedReference,
    AccessError,
    ResolutionError,
    InvalidTraitSet,
}

/// Structured error as delivered through a callback sink or reported to a
/// caller. Transient: created per call, consumed by the immediate caller.
///
/// `index` and `code` are present iff `kind` is [`ErrorKind::BatchElement`];
/// use the constructors to keep that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ElementErrorCode>,
    pub message: String,
}

impl ErrorDetail {
    /// Detail for a failure not attributable to a single input element.
    pub fn call_level(kind: ErrorKind, message: impl Into<String>) -> Self {
        debug_assert!(!kind.is_per_element());
        Self {
            kind,
            index: None,
            code: None,
            message: message.into(),
        }
    }

    /// Detail for a failure of exactly one batch index.
    pub fn batch_element(
        index: usize,
        code: ElementErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::BatchElement,
            index: Some(index),
            code: Some(code),
            message: message.into(),
        }
    }
}

/// Call-level error type used on the native side.
///
/// Per-element failures only appear here when an error-converting adapter
/// re-raises one; they are otherwise delivered through the sink for their
/// index and never unwind the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("input validation failed: {0}")]
    InputValidation(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("element {index} failed ({code:?}): {message}")]
    BatchElement {
        index: usize,
        code: ElementErrorCode,
        message: String,
    },

    #[error("unhandled error: {0}")]
    Unhandled(String),
}

impl BridgeError {
    /// The canonical kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::InputValidation(_) => ErrorKind::InputValidation,
            BridgeError::Configuration(_) => ErrorKind::Configuration,
            BridgeError::NotImplemented(_) => ErrorKind::NotImplemented,
            BridgeError::BatchElement { .. } => ErrorKind::BatchElement,
            BridgeError::Unhandled(_) => ErrorKind::Unhandled,
        }
    }

    /// The message without kind framing.
    pub fn message(&self) -> &str {
        match self {
            BridgeError::InputValidation(msg)
            | BridgeError::Configuration(msg)
            | BridgeError::NotImplemented(msg)
            | BridgeError::Unhandled(msg) => msg,
            BridgeError::BatchElement { message, .. } => message,
        }
    }

    /// Lossless conversion to the wire detail.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            BridgeError::BatchElement {
                index,
                code,
                message,
            } => ErrorDetail::batch_element(*index, *code, message.clone()),
            other => ErrorDetail::call_level(other.kind(), other.message()),
        }
    }

    /// Reconstruct from a wire detail.
    ///
    /// A `BatchElement` detail missing its index cannot be attributed to an
    /// element and is wrapped as `Unhandled` rather than guessed at.
    pub fn from_detail(detail: &ErrorDetail) -> Self {
        match detail.kind {
            ErrorKind::InputValidation => BridgeError::InputValidation(detail.message.clone()),
            ErrorKind::Configuration => BridgeError::Configuration(detail.message.clone()),
            ErrorKind::NotImplemented => BridgeError::NotImplemented(detail.message.clone()),
            ErrorKind::Unhandled => BridgeError::Unhandled(detail.message.clone()),
            ErrorKind::BatchElement => match detail.index {
                Some(index) => BridgeError::BatchElement {
                    index,
                    code: detail.code.unwrap_or(ElementErrorCode::Unknown),
                    message: detail.message.clone(),
                },
                None => BridgeError::Unhandled(format!(
                    "batch element error without an index: {}",
                    detail.message
                )),
            },
        }
    }
}

impl From<anyhow::Error> for BridgeError {
    fn from(err: anyhow::Error) -> Self {
        BridgeError::Unhandled(format!("{err:#}"))
    }
}
