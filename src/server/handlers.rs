use crate::relay::{IncomingRequest, OutgoingResponse, Relay};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

/// The browser-facing endpoint: method and raw body are relayed as-is and
/// the envelope is rendered as a real HTTP response.
/// Invalid UTF-8 is replaced rather than rejected, so it still gets an
/// envelope.
pub async fn interview_assist(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    let body = String::from_utf8_lossy(&body);
    match state
        .relay
        .handle(IncomingRequest::new(method.as_str(), body))
        .await
    {
        Ok(envelope) => envelope.into_response(),
        Err(e) => {
            error!("Failed to encode response body: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Proxy-event endpoint: takes an `IncomingRequest` document and returns
/// the envelope itself as JSON.
pub async fn invoke(
    State(state): State<AppState>,
    Json(event): Json<IncomingRequest>,
) -> Result<Json<OutgoingResponse>, StatusCode> {
    state.relay.handle(event).await.map(Json).map_err(|e| {
        error!("Failed to encode response body: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

impl IntoResponse for OutgoingResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Dropping invalid response header: {}", name),
            }
        }
        if !self.body.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        (status, headers, self.body).into_response()
    }
}
