//! Caller-facing responses.
//!
//! # Responsibilities
//! - Map every pipeline result to the public response contract
//! - Keep internal causes out of response bodies
//!
//! # Design Decisions
//! - Delivered and degraded deliveries look identical apart from wording
//! - All rejection reasons collapse into one 400 body
//! - Malformed or stalled bodies, hook transport failures, expired requests
//!   and panics share one 500 body

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::relay::{RelayError, RelayOutcome};
use crate::submission::RejectReason;

pub const DELIVERED_MESSAGE: &str =
    "Submission received! Your story has been sent for script generation.";
pub const RECEIVED_MESSAGE: &str = "Submission received! Your story is being processed.";
pub const INVALID_SUBMISSION_ERROR: &str =
    "Invalid submission - please provide a valid title and story";
pub const PROCESSING_ERROR: &str = "Processing error - please try again later";

/// The only method the submission route accepts.
pub const ALLOWED_METHOD: &str = "POST";

/// Every way a submission can fail from the caller's point of view.
///
/// The `Display` text is for operator logs. [`IntoResponse`] never uses it.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("submission rejected: {0}")]
    Rejected(RejectReason),

    #[error("malformed request body: {0}")]
    Malformed(String),

    #[error(transparent)]
    Downstream(#[from] RelayError),

    #[error("request not answered within {0}s")]
    DeadlineExceeded(u64),

    #[error("handler panicked")]
    Panicked,
}

impl SubmissionError {
    /// Outcome label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionError::MethodNotAllowed(_) => "method_not_allowed",
            SubmissionError::Rejected(_) => "rejected",
            SubmissionError::Malformed(_) => "malformed",
            SubmissionError::Downstream(_) => "errored",
            SubmissionError::DeadlineExceeded(_) => "timed_out",
            SubmissionError::Panicked => "panicked",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            SubmissionError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            SubmissionError::Rejected(_) => StatusCode::BAD_REQUEST,
            SubmissionError::Malformed(_)
            | SubmissionError::Downstream(_)
            | SubmissionError::DeadlineExceeded(_)
            | SubmissionError::Panicked => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct SuccessBody {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            SubmissionError::MethodNotAllowed(_) => (
                status,
                [(header::ALLOW, HeaderValue::from_static(ALLOWED_METHOD))],
                "Method not allowed",
            )
                .into_response(),
            SubmissionError::Rejected(_) => failure(status, INVALID_SUBMISSION_ERROR),
            SubmissionError::Malformed(_)
            | SubmissionError::Downstream(_)
            | SubmissionError::DeadlineExceeded(_)
            | SubmissionError::Panicked => failure(status, PROCESSING_ERROR),
        }
    }
}

fn failure(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorBody { success: false, error })).into_response()
}

fn success(message: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHOD),
            ),
        ],
        Json(SuccessBody { success: true, message }),
    )
        .into_response()
}

/// Map the relay outcome to what the caller sees.
///
/// A downstream non-2xx is reported as success: the submitter can do nothing
/// about it and the status would reveal the hook behind the form.
pub fn relay_response(outcome: RelayOutcome) -> Response {
    match outcome {
        RelayOutcome::Delivered => success(DELIVERED_MESSAGE),
        RelayOutcome::DegradedDelivered { .. } => success(RECEIVED_MESSAGE),
        RelayOutcome::Errored(e) => SubmissionError::Downstream(e).into_response(),
    }
}
