//! Bidirectional, structure-preserving conversion applied at every boundary
//! crossing.
//!
//! Identity is decided by a statically enumerated class-name table qualified
//! by the declaring module, never by unscoped name comparison. An error whose
//! identity does not match any canonical kind is wrapped as `UnhandledError`
//! with its message preserved.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::taxonomy::{BridgeError, ErrorDetail, ErrorKind};

/// Module that declares the canonical error classes on the foreign side.
/// Identity checks are scoped by it so a same-named class from unrelated
/// foreign code never matches.
pub const ERRORS_MODULE: &str = "refbridge.errors";

/// Exhaustive class-name bindings, ordered most-specific first so the table
/// mirrors the dispatch order a foreign runtime applies to its hierarchy.
const BINDINGS: &[(&str, ErrorKind)] = &[
    ("BatchElementError", ErrorKind::BatchElement),
    ("NotImplementedError", ErrorKind::NotImplemented),
    ("UnhandledError", ErrorKind::Unhandled),
    ("ConfigurationError", ErrorKind::Configuration),
    ("InputValidationError", ErrorKind::InputValidation),
];

static KIND_BY_CLASS: Lazy<HashMap<&'static str, ErrorKind>> =
    Lazy::new(|| BINDINGS.iter().copied().collect());

/// Foreign class name for a canonical kind.
pub fn class_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InputValidation => "InputValidationError",
        ErrorKind::Configuration => "ConfigurationError",
        ErrorKind::NotImplemented => "NotImplementedError",
        ErrorKind::BatchElement => "BatchElementError",
        ErrorKind::Unhandled => "UnhandledError",
    }
}

/// Error object as reconstructed for, or received from, the foreign runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignError {
    pub module: String,
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<crate::taxonomy::ElementErrorCode>,
    pub message: String,
}

/// Build the foreign representation of a call-level error.
pub fn to_foreign(err: &BridgeError) -> ForeignError {
    detail_to_foreign(&err.detail())
}

/// Reconstruct a native error from a foreign one.
///
/// Unknown module or class name wraps as `Unhandled`; the message survives.
pub fn from_foreign(err: &ForeignError) -> BridgeError {
    BridgeError::from_detail(&detail_from_foreign(err))
}

/// Build the foreign representation of a wire detail.
pub fn detail_to_foreign(detail: &ErrorDetail) -> ForeignError {
    ForeignError {
        module: ERRORS_MODULE.to_string(),
        class_name: class_name(detail.kind).to_string(),
        index: detail.index,
        code: detail.code,
        message: detail.message.clone(),
    }
}

/// Reconstruct a wire detail from a foreign error.
pub fn detail_from_foreign(err: &ForeignError) -> ErrorDetail {
    if err.module != ERRORS_MODULE {
        debug!(
            module = %err.module,
            class = %err.class_name,
            "wrapping error declared outside the canonical module"
        );
        return ErrorDetail::call_level(ErrorKind::Unhandled, err.message.clone());
    }
    match KIND_BY_CLASS.get(err.class_name.as_str()) {
        Some(kind) => ErrorDetail {
            kind: *kind,
            index: if kind.is_per_element() { err.index } else { None },
            code: if kind.is_per_element() { err.code } else { None },
            message: err.message.clone(),
        },
        None => {
            debug!(class = %err.class_name, "wrapping unrecognized error class");
            ErrorDetail::call_level(ErrorKind::Unhandled, err.message.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::ElementErrorCode;

    #[test]
    fn round_trip_preserves_structure() {
        let err = BridgeError::BatchElement {
            index: 7,
            code: ElementErrorCode::AccessError,
            message: "permission denied".into(),
        };
        let foreign = to_foreign(&err);
        assert_eq!(foreign.module, ERRORS_MODULE);
        assert_eq!(foreign.class_name, "BatchElementError");
        assert_eq!(foreign.index, Some(7));
        assert_eq!(from_foreign(&foreign), err);
    }

    #[test]
    fn round_trip_preserves_call_level_kinds() {
        for err in [
            BridgeError::InputValidation("bad".into()),
            BridgeError::Configuration("worse".into()),
            BridgeError::NotImplemented("missing".into()),
            BridgeError::Unhandled("boom".into()),
        ] {
            assert_eq!(from_foreign(&to_foreign(&err)), err);
        }
    }

    #[test]
    fn same_named_class_from_another_module_does_not_match() {
        let imposter = ForeignError {
            module: "some.other.package".into(),
            class_name: "InputValidationError".into(),
            index: None,
            code: None,
            message: "unrelated".into(),
        };
        let err = from_foreign(&imposter);
        assert!(matches!(err, BridgeError::Unhandled(ref msg) if msg == "unrelated"));
    }

    #[test]
    fn unknown_class_is_wrapped_with_message_preserved() {
        let foreign = ForeignError {
            module: ERRORS_MODULE.into(),
            class_name: "SomethingElseEntirely".into(),
            index: None,
            code: None,
            message: "third-party failure".into(),
        };
        assert_eq!(
            from_foreign(&foreign),
            BridgeError::Unhandled("third-party failure".into())
        );
    }

    #[test]
    fn stray_index_on_call_level_class_is_discarded() {
        let foreign = ForeignError {
            module: ERRORS_MODULE.into(),
            class_name: "ConfigurationError".into(),
            index: Some(4),
            code: Some(ElementErrorCode::Unknown),
            message: "misconfigured".into(),
        };
        let detail = detail_from_foreign(&foreign);
        assert_eq!(detail.kind, ErrorKind::Configuration);
        assert_eq!(detail.index, None);
        assert_eq!(detail.code, None);
    }

    #[test]
    fn every_kind_is_bound_exactly_once() {
        assert_eq!(BINDINGS.len(), KIND_BY_CLASS.len());
        for (name, kind) in BINDINGS {
            assert_eq!(class_name(*kind), *name);
        }
    }
}
