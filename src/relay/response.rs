use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";

pub const ALLOWED_ORIGIN: &str = "*";
pub const ALLOWED_METHODS: &str = "OPTIONS, POST";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Amz-Date, X-Api-Key, X-Amz-Security-Token, Accept, Origin, Cache-Control, X-Requested-With";

/// The `{statusCode, headers, body}` envelope returned for every outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessBody {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn cors_headers() -> BTreeMap<String, String> {
    [
        (ALLOW_ORIGIN, ALLOWED_ORIGIN),
        (ALLOW_METHODS, ALLOWED_METHODS),
        (ALLOW_HEADERS, ALLOWED_HEADERS),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
}

impl OutgoingResponse {
    pub fn preflight() -> Self {
        Self {
            status_code: 200,
            headers: cors_headers(),
            body: String::new(),
        }
    }

    pub fn success(text: &str) -> Result<Self> {
        let body = serde_json::to_string(&SuccessBody {
            response: text.to_string(),
        })?;
        Ok(Self {
            status_code: 200,
            headers: cors_headers(),
            body,
        })
    }

    pub fn error(status_code: u16, message: &str) -> Result<Self> {
        let body = serde_json::to_string(&ErrorBody {
            error: message.to_string(),
        })?;
        Ok(Self {
            status_code,
            headers: cors_headers(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preflight_has_cors_and_empty_body() {
        let response = OutgoingResponse::preflight();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers.len(), 3);
        assert_eq!(response.headers[ALLOW_ORIGIN], "*");
        assert_eq!(response.headers[ALLOW_METHODS], "OPTIONS, POST");
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_success_body_escapes_text() {
        let response = OutgoingResponse::success("Use the \"STAR\" framework\n").unwrap();
        assert_eq!(
            response.body,
            r#"{"response":"Use the \"STAR\" framework\n"}"#
        );
        assert_eq!(response.status_code, 200);
    }

    #[test]
    fn test_error_envelope() {
        let response = OutgoingResponse::error(500, "Prompt cannot be empty").unwrap();
        assert_eq!(response.status_code, 500);
        assert_eq!(response.headers, cors_headers());
        assert_eq!(response.body, r#"{"error":"Prompt cannot be empty"}"#);
    }

    #[test]
    fn test_envelope_field_names() {
        let value = serde_json::to_value(OutgoingResponse::preflight()).unwrap();
        assert!(value.get("statusCode").is_some());
        assert!(value.get("headers").is_some());
        assert_eq!(value["body"], "");
    }
}
