// リクエストボディのパース

use lambda_http::Body;
use serde::de::DeserializeOwned;

use super::WorkflowError;

/// JSONボディを型付きリクエストにパースする
///
/// 空ボディや不正なJSONは`WorkflowError::InvalidBody`（400）になる。
/// フィールドの欠落はここではエラーにせず、各リクエストの検証に任せる。
pub fn parse_json_body<T: DeserializeOwned>(body: &Body) -> Result<T, WorkflowError> {
    let bytes: &[u8] = match body {
        Body::Empty => return Err(WorkflowError::InvalidBody("empty body".to_string())),
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes.as_slice(),
        _ => &body[..],
    };

    serde_json::from_slice(bytes).map_err(|e| WorkflowError::InvalidBody(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AddMemberRequest, CreateUserRequest};

    #[test]
    fn test_parse_text_body() {
        let body = Body::Text(r#"{"email":"a@b.com","name":"Jo"}"#.to_string());
        let request: CreateUserRequest = parse_json_body(&body).unwrap();

        assert_eq!(request.email.as_deref(), Some("a@b.com"));
        assert_eq!(request.name.as_deref(), Some("Jo"));
        assert!(request.nickname.is_none());
    }

    #[test]
    fn test_parse_binary_body() {
        let body = Body::Binary(br#"{"user_id":"u-1","group_id":"g-1"}"#.to_vec());
        let request: AddMemberRequest = parse_json_body(&body).unwrap();

        assert_eq!(request.user_id.as_deref(), Some("u-1"));
        assert_eq!(request.group_id.as_deref(), Some("g-1"));
    }

    #[test]
    fn test_missing_fields_are_not_parse_errors() {
        let body = Body::Text("{}".to_string());
        let request: AddMemberRequest = parse_json_body(&body).unwrap();
        assert!(request.user_id.is_none());
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let body = Body::Text("{not json".to_string());
        let result: Result<AddMemberRequest, _> = parse_json_body(&body);
        assert!(matches!(result, Err(WorkflowError::InvalidBody(_))));
    }

    #[test]
    fn test_empty_body_is_rejected() {
        let result: Result<AddMemberRequest, _> = parse_json_body(&Body::Empty);
        assert!(matches!(result, Err(WorkflowError::InvalidBody(_))));
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let body = Body::Text(r#"{"user_id":42}"#.to_string());
        let result: Result<AddMemberRequest, _> = parse_json_body(&body);
        assert!(matches!(result, Err(WorkflowError::InvalidBody(_))));
    }
}
