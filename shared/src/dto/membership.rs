use serde::{Deserialize, Serialize};

/// Success body of `POST /clubs/{clubId}/join` and `/leave`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MembershipActionResponse {
    pub message: String,
}

/// Optional failure body of the club API endpoints.
///
/// Non-2xx responses may carry `{ "detail": "..." }`; absence of the field
/// means the caller falls back to a status-based message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_with_detail() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"detail":"server error"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("server error"));
    }

    #[test]
    fn test_error_body_without_detail() {
        let body: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.detail.is_none());
    }
}
