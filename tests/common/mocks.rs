use async_trait::async_trait;
use interview_relay::{
    Error, Result,
    llm::{InferenceClient, InvokeModelRequest},
};
use std::sync::{Arc, Mutex};

/// Mock inference client that records every request and answers each call
/// with the same canned response or error.
#[derive(Debug, Default)]
pub struct MockInferenceClient {
    pub response: Option<Vec<u8>>,
    pub requests: Arc<Mutex<Vec<InvokeModelRequest>>>,
    pub error: Option<String>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.response = Some(body.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn get_requests(&self) -> Vec<InvokeModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn invoke_model(&self, request: InvokeModelRequest) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.error {
            return Err(Error::invocation(error.clone()));
        }

        self.response
            .clone()
            .ok_or_else(|| Error::invocation("No mock response configured"))
    }
}
