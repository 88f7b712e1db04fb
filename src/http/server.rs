//! HTTP server setup and the submission handler.
//!
//! # Responsibilities
//! - Create Axum Router with the submission handler
//! - Wire up middleware (request ID, tracing, panic catching)
//! - Bind server to listener, shut down on signal
//! - Run the pipeline: gate → parse → screen → build → relay → respond
//!
//! # Design Decisions
//! - The request deadline is enforced inside the handler so an expired
//!   request still gets the JSON processing error, never a bare 408

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::request::{gate, read_json, request_id, MakeRequestUuidV4};
use crate::http::response::{relay_response, SubmissionError};
use crate::observability::metrics;
use crate::relay::{OutboundMessage, RelayClient, RelayError, RelayOutcome};
use crate::submission::{screen, RawSubmission};

/// Application state injected into handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub relay: RelayClient,
}

/// HTTP server for the submission relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let config = Arc::new(config);
        let relay = RelayClient::new(&config.downstream)?;

        let state = AppState { config, relay };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(submit_handler))
            .route("/{*path}", any(submit_handler))
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Submission handler. Every path ends in a response; nothing escapes.
async fn submit_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request);
    let deadline = Duration::from_secs(state.config.timeouts.request_secs);

    let result = tokio::time::timeout(deadline, handle_submission(&state, request))
        .await
        .unwrap_or(Err(SubmissionError::DeadlineExceeded(deadline.as_secs())));

    match result {
        Ok(outcome) => {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &outcome {
                RelayOutcome::Delivered => {
                    tracing::info!(request_id = %request_id, elapsed_ms, "Submission relayed");
                }
                RelayOutcome::DegradedDelivered { status } => {
                    tracing::warn!(
                        request_id = %request_id,
                        downstream_status = %status,
                        elapsed_ms,
                        "Submission acknowledged but downstream hook failed"
                    );
                }
                RelayOutcome::Errored(e) => {
                    tracing::error!(request_id = %request_id, error = %e, elapsed_ms, "Submission relay failed");
                }
            }
            metrics::record_submission(outcome.label());
            relay_response(outcome)
        }
        Err(err) => {
            match &err {
                SubmissionError::Malformed(_) => {
                    tracing::warn!(request_id = %request_id, error = %err, "Unreadable submission");
                }
                SubmissionError::DeadlineExceeded(_) => {
                    tracing::error!(request_id = %request_id, error = %err, "Submission timed out");
                }
                _ => {
                    tracing::debug!(request_id = %request_id, error = %err, "Submission refused");
                }
            }
            metrics::record_submission(err.label());
            err.into_response()
        }
    }
}

async fn handle_submission(
    state: &AppState,
    request: Request<Body>,
) -> Result<RelayOutcome, SubmissionError> {
    gate(request.method())?;

    let body = read_json(
        request.into_body(),
        state.config.security.max_body_size,
        Duration::from_secs(state.config.timeouts.body_read_secs),
    )
    .await?;
    let raw = RawSubmission::from_json(&body);

    let accepted = screen(&raw).map_err(|rejection| {
        tracing::info!(
            reason = %rejection.reason,
            title = %rejection.title_prefix,
            "Rejected invalid/spam submission"
        );
        metrics::record_rejection(rejection.reason.label());
        SubmissionError::Rejected(rejection.reason)
    })?;

    tracing::debug!(slug = %accepted.slug, "Submission accepted");

    let message = OutboundMessage::for_downstream(&accepted, &state.config.downstream);
    Ok(state.relay.relay(&message).await)
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Handler panicked");
    metrics::record_submission(SubmissionError::Panicked.label());
    SubmissionError::Panicked.into_response()
}
