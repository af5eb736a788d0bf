use crate::{Error, Result, config::PromptSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A proxy-style event as delivered by an HTTP trigger.
///
/// Two shapes are accepted: `{"httpMethod": "POST", "body": "{\"prompt\": ...}"}`
/// where `body` holds JSON text (or an already-decoded object), and a flat
/// `{"prompt": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomingRequest {
    #[serde(rename = "httpMethod", default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Value>,
}

impl IncomingRequest {
    /// Request with a raw JSON body, as received over HTTP.
    pub fn new(method: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            http_method: Some(method.into()),
            body: Some(Value::String(body.into())),
            prompt: None,
        }
    }

    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            http_method: None,
            body: None,
            prompt: Some(Value::String(prompt.into())),
        }
    }

    pub fn method(&self) -> Option<&str> {
        self.http_method.as_deref()
    }

    pub fn is_preflight(&self) -> bool {
        self.method()
            .is_some_and(|method| method.trim().eq_ignore_ascii_case("OPTIONS"))
    }

    /// Extracts and validates the prompt.
    pub fn prompt(&self, source: PromptSource) -> Result<Prompt> {
        let raw = match source {
            PromptSource::Body => self.body_prompt()?,
            PromptSource::TopLevel => self.prompt.as_ref().and_then(value_text),
            PromptSource::Auto => match self.body_prompt() {
                Ok(Some(prompt)) => Some(prompt),
                Ok(None) => self.prompt.as_ref().and_then(value_text),
                Err(e) => match self.prompt.as_ref().and_then(value_text) {
                    Some(prompt) => Some(prompt),
                    None => return Err(e),
                },
            },
        };

        Prompt::new(raw.as_deref().unwrap_or_default())
    }

    fn body_prompt(&self) -> Result<Option<String>> {
        match &self.body {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => {
                let decoded: Value = serde_json::from_str(text)
                    .map_err(|e| Error::validation(format!("Invalid request body: {}", e)))?;
                Ok(decoded.get("prompt").and_then(value_text))
            }
            Some(object @ Value::Object(_)) => Ok(object.get("prompt").and_then(value_text)),
            Some(_) => Ok(None),
        }
    }
}

/// Textual form of a scalar field; containers and null have none.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Trimmed, non-empty prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("Prompt cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
