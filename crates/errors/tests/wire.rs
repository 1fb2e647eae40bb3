//! Wire-shape tests for the structured error detail.

use refbridge_errors::{
    detail_from_foreign, detail_to_foreign, ElementErrorCode, ErrorDetail, ErrorKind, ForeignError,
};

#[test]
fn batch_element_detail_serializes_with_index_and_code() {
    let detail = ErrorDetail::batch_element(1, ElementErrorCode::Unknown, "not found");
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "kind": "BatchElementError",
            "index": 1,
            "code": "unknown",
            "message": "not found",
        })
    );
}

#[test]
fn call_level_detail_omits_optional_fields() {
    let detail = ErrorDetail::call_level(ErrorKind::InputValidation, "malformed parameters");
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "kind": "InputValidationError",
            "message": "malformed parameters",
        })
    );
}

#[test]
fn detail_deserializes_from_wire_json() {
    let detail: ErrorDetail = serde_json::from_str(
        r#"{"kind":"BatchElementError","index":2,"code":"resolutionError","message":"gone"}"#,
    )
    .unwrap();
    assert_eq!(
        detail,
        ErrorDetail::batch_element(2, ElementErrorCode::ResolutionError, "gone")
    );
}

#[test]
fn foreign_error_survives_serialization() {
    let foreign = detail_to_foreign(&ErrorDetail::batch_element(
        0,
        ElementErrorCode::MalformedReference,
        "no scheme",
    ));
    let json = serde_json::to_string(&foreign).unwrap();
    let back: ForeignError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, foreign);
    assert_eq!(
        detail_from_foreign(&back),
        ErrorDetail::batch_element(0, ElementErrorCode::MalformedReference, "no scheme")
    );
}
