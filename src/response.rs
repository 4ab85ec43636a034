use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

const ENCODE_FAILURE_BODY: &str = r#"{"error":"Failed to encode response"}"#;

/// Serializes `payload` and writes it as a JSON response with `status`.
///
/// The body is encoded before anything is written, so an encoding failure
/// turns into a clean 500 instead of a half-sent response.
pub fn respond<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> Response {
    match serde_json::to_vec(payload) {
        Ok(body) => json_bytes(status, body),
        Err(e) => {
            error!(error = %e, %status, "failed to encode response body");
            json_bytes(
                StatusCode::INTERNAL_SERVER_ERROR,
                ENCODE_FAILURE_BODY.as_bytes().to_vec(),
            )
        }
    }
}

fn json_bytes(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response()
}

/// Envelope for operations that have nothing else to return.
#[derive(Debug, Serialize)]
pub struct Success {
    pub completed: bool,
    pub message: String,
}

impl Success {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            completed: true,
            message: message.into(),
        }
    }
}
