//! Request handling ahead of the submission pipeline.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) unless the caller sent one
//! - Gate the submission route on its single allowed method
//! - Read the body under the configured size limit and read deadline, then
//!   parse it as JSON
//!
//! # Design Decisions
//! - The gate runs before the body is touched
//! - Parse failures become [`SubmissionError::Malformed`]; the cause is
//!   logged, never returned

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderValue, Method, Request},
};
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::SubmissionError;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID set by the request-id layer.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Only `POST` gets past the gate.
pub fn gate(method: &Method) -> Result<(), SubmissionError> {
    if *method == Method::POST {
        Ok(())
    } else {
        Err(SubmissionError::MethodNotAllowed(method.to_string()))
    }
}

/// Buffer at most `limit` bytes of body within `deadline` and parse them as JSON.
pub async fn read_json(
    body: Body,
    limit: usize,
    deadline: Duration,
) -> Result<Value, SubmissionError> {
    let bytes = tokio::time::timeout(deadline, axum::body::to_bytes(body, limit))
        .await
        .map_err(|_| {
            SubmissionError::Malformed(format!("body not received within {}s", deadline.as_secs()))
        })?
        .map_err(|e| SubmissionError::Malformed(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| SubmissionError::Malformed(e.to_string()))
}
