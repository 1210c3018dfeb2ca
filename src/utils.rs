use axum::body::Bytes;
use serde_json::Value;

use crate::error::AppError;

pub const PURCHASE_FIELDS_REQUIRED: &str =
    "itemId (number) and isPurchased (boolean) are required";
pub const SKIP_FIELDS_REQUIRED: &str = "itemId (number) and isSkipped (boolean) are required";

#[derive(Debug)]
pub struct StatusUpdate {
    pub item_id: i64,
    pub value: bool,
}

/// Parses `{"itemId": number, "isPurchased": boolean}`. Any shape mismatch is
/// a validation error; nothing reaches the database afterwards.
pub fn parse_purchase_update(bytes: &Bytes) -> Result<StatusUpdate, AppError> {
    parse_status_update(bytes, "isPurchased", PURCHASE_FIELDS_REQUIRED)
}

/// Parses `{"itemId": number, "isSkipped": boolean}`.
pub fn parse_skip_update(bytes: &Bytes) -> Result<StatusUpdate, AppError> {
    parse_status_update(bytes, "isSkipped", SKIP_FIELDS_REQUIRED)
}

fn parse_status_update(
    bytes: &Bytes,
    flag_field: &str,
    required: &str,
) -> Result<StatusUpdate, AppError> {
    let invalid = || AppError::Validation(required.to_string());

    let payload: Value = serde_json::from_slice(bytes).map_err(|_| invalid())?;

    let item_id = payload
        .get("itemId")
        .and_then(Value::as_i64)
        .ok_or_else(invalid)?;

    let value = payload
        .get(flag_field)
        .and_then(Value::as_bool)
        .ok_or_else(invalid)?;

    Ok(StatusUpdate { item_id, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<StatusUpdate, AppError> {
        parse_purchase_update(&Bytes::from(body.to_string()))
    }

    #[test]
    fn accepts_well_formed_payload() {
        let update = parse(r#"{"itemId": 5, "isPurchased": true}"#).unwrap();

        assert_eq!(update.item_id, 5);
        assert!(update.value);
    }

    #[test]
    fn rejects_missing_item_id() {
        assert!(parse(r#"{"isPurchased": true}"#).is_err());
    }

    #[test]
    fn rejects_string_item_id() {
        assert!(parse(r#"{"itemId": "5", "isPurchased": true}"#).is_err());
    }

    #[test]
    fn rejects_fractional_item_id() {
        assert!(parse(r#"{"itemId": 5.5, "isPurchased": true}"#).is_err());
    }

    #[test]
    fn rejects_non_boolean_flag() {
        assert!(parse(r#"{"itemId": 5, "isPurchased": "yes"}"#).is_err());
    }

    #[test]
    fn rejects_non_json_body() {
        assert!(parse("not json").is_err());
    }

    #[test]
    fn validation_error_carries_contract_message() {
        let err = parse("{}").unwrap_err();

        match err {
            AppError::Validation(msg) => assert_eq!(msg, PURCHASE_FIELDS_REQUIRED),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn skip_update_uses_its_own_flag_field() {
        let bytes = Bytes::from(r#"{"itemId": 3, "isSkipped": false}"#);
        let update = parse_skip_update(&bytes).unwrap();

        assert_eq!(update.item_id, 3);
        assert!(!update.value);

        // A purchase payload is not a valid skip payload.
        let bytes = Bytes::from(r#"{"itemId": 3, "isPurchased": false}"#);
        assert!(parse_skip_update(&bytes).is_err());
    }
}
