//! Canonical error taxonomy for the refbridge interop layer.
//!
//! Errors crossing the boundary between the native core and a foreign
//! runtime keep their structure in both directions: a per-element failure
//! stays tied to its batch index and sub-code, and a call-level failure
//! keeps its kind, so kind-based dispatch behaves identically on either
//! side. Anything that does not belong to the taxonomy is wrapped, never
//! dropped.

pub mod convert;
pub mod taxonomy;

pub use convert::{
    class_name, detail_from_foreign, detail_to_foreign, from_foreign, to_foreign, ForeignError,
    ERRORS_MODULE,
};
pub use taxonomy::{BridgeError, ElementErrorCode, ErrorDetail, ErrorKind};

pub type Result<T> = std::result::Result<T, BridgeError>;
