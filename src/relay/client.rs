//! Downstream hook client.
//!
//! # Responsibilities
//! - Send exactly one authenticated POST per accepted submission
//! - Bound the attempt with the client timeout
//! - Classify the answer into a [`RelayOutcome`]
//!
//! # Design Decisions
//! - No retries: a duplicate script request is worse than a missing one
//! - The token goes out twice, as `Authorization: Bearer` and as
//!   `X-Openclaw-Token`, since the hook accepts either convention
//! - The connection pool inside `reqwest::Client` is shared across requests;
//!   nothing else is

use std::time::{Duration, Instant};

use url::Url;

use crate::config::{DownstreamConfig, SecretString};
use crate::observability::metrics;
use crate::relay::message::OutboundMessage;
use crate::relay::types::{RelayError, RelayOutcome};

/// Vendor header carrying the same token as the bearer header.
pub const TOKEN_HEADER: &str = "x-openclaw-token";

/// Bytes of a failing downstream body kept in the log line.
const ERROR_BODY_LOG_LIMIT: usize = 512;

/// Client for the downstream automation hook.
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    url: Option<Url>,
    token: SecretString,
    timeout_secs: u64,
}

impl RelayClient {
    /// Create a client from the downstream configuration.
    ///
    /// A missing URL is allowed; every relay attempt then reports
    /// [`RelayError::NotConfigured`].
    pub fn new(config: &DownstreamConfig) -> Result<Self, RelayError> {
        let url = config
            .url
            .as_deref()
            .map(|raw| Url::parse(raw).map_err(|e| RelayError::InvalidUrl(format!("{raw}: {e}"))))
            .transpose()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if url.is_none() {
            tracing::warn!("Downstream URL not set; submissions will fail with a processing error");
        }
        if config.token.is_empty() {
            tracing::warn!("Downstream token not set; the hook will likely refuse submissions");
        }

        Ok(Self {
            http,
            url,
            token: config.token.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// The configured hook URL, if any.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Make the single outbound attempt for `message`.
    pub async fn relay(&self, message: &OutboundMessage) -> RelayOutcome {
        let Some(url) = &self.url else {
            return RelayOutcome::Errored(RelayError::NotConfigured);
        };

        let start = Instant::now();
        let token = self.token.expose();
        let result = self
            .http
            .post(url.clone())
            .bearer_auth(token)
            .header(TOKEN_HEADER, token)
            .json(message)
            .send()
            .await;

        let outcome = match result {
            Ok(response) if response.status().is_success() => RelayOutcome::Delivered,
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!(
                    status = %status,
                    body = %truncate_for_log(&body),
                    "Downstream hook rejected submission"
                );
                RelayOutcome::DegradedDelivered { status }
            }
            Err(e) if e.is_timeout() => {
                tracing::error!(timeout_secs = self.timeout_secs, "Downstream hook timed out");
                RelayOutcome::Errored(RelayError::Timeout(self.timeout_secs))
            }
            Err(e) => {
                tracing::error!(error = %e, "Downstream hook unreachable");
                RelayOutcome::Errored(RelayError::Transport(e))
            }
        };

        metrics::record_downstream(outcome.label(), start);
        outcome
    }
}

fn truncate_for_log(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_LOG_LIMIT) {
        Some((cut, _)) => &body[..cut],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{screen, RawSubmission};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records the level, message and fields of every event.
    #[derive(Clone, Default)]
    struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

    impl CapturedEvents {
        fn at(&self, level: Level) -> Vec<String> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, line)| line.clone())
                .collect()
        }
    }

    struct LineVisitor(String);

    impl Visit for LineVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0.insert_str(0, &format!("{value:?}"));
            } else {
                self.0.push_str(&format!(" {}={:?}", field.name(), value));
            }
        }
    }

    impl<S: Subscriber> Layer<S> for CapturedEvents {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = LineVisitor(String::new());
            event.record(&mut visitor);
            self.0
                .lock()
                .unwrap()
                .push((*event.metadata().level(), visitor.0));
        }
    }

    fn message() -> OutboundMessage {
        let accepted = screen(&RawSubmission {
            title: "My Dog Ate A Sock".into(),
            story: "He looked so proud about it and would not stop wagging.".into(),
            location: String::new(),
        })
        .unwrap();
        OutboundMessage::build(&accepted, "42")
    }

    fn client_for(server: &MockServer, timeout_secs: u64) -> RelayClient {
        let config = DownstreamConfig {
            url: Some(format!("{}/hooks/agent", server.uri())),
            token: "hook-token".into(),
            timeout_secs,
            ..DownstreamConfig::default()
        };
        RelayClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_delivered_with_both_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks/agent"))
            .and(header("authorization", "Bearer hook-token"))
            .and(header(TOKEN_HEADER, "hook-token"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "name": "TR-Submission",
                "channel": "telegram",
                "to": "42",
                "deliver": true,
                "wakeMode": "now",
                "timeoutSeconds": 120,
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server, 5).relay(&message()).await;
        assert!(matches!(outcome, RelayOutcome::Delivered));
    }

    #[tokio::test]
    async fn test_server_error_is_degraded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server, 5).relay(&message()).await;
        assert!(matches!(
            outcome,
            RelayOutcome::DegradedDelivered { status } if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn test_degraded_delivery_is_logged_at_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("agent offline"))
            .mount(&server)
            .await;
        let client = client_for(&server, 5);

        let captured = CapturedEvents::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        let outcome = {
            let _guard = tracing::subscriber::set_default(subscriber);
            client.relay(&message()).await
        };

        assert_eq!(outcome.label(), "degraded");
        let errors = captured.at(Level::ERROR);
        assert_eq!(errors.len(), 1, "error events: {errors:?}");
        assert!(errors[0].starts_with("Downstream hook rejected submission"));
        assert!(errors[0].contains("status=502"));
        assert!(errors[0].contains("agent offline"));
    }

    #[tokio::test]
    async fn test_unauthorized_is_degraded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let outcome = client_for(&server, 5).relay(&message()).await;
        assert_eq!(outcome.label(), "degraded");
    }

    #[tokio::test]
    async fn test_timeout_is_errored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let outcome = client_for(&server, 1).relay(&message()).await;
        assert!(matches!(outcome, RelayOutcome::Errored(RelayError::Timeout(1))));
    }

    #[tokio::test]
    async fn test_unreachable_is_errored() {
        let config = DownstreamConfig {
            url: Some("http://127.0.0.1:1/hooks/agent".into()),
            timeout_secs: 5,
            ..DownstreamConfig::default()
        };
        let outcome = RelayClient::new(&config).unwrap().relay(&message()).await;
        assert!(matches!(outcome, RelayOutcome::Errored(RelayError::Transport(_))));
    }

    #[tokio::test]
    async fn test_missing_url_is_errored() {
        let client = RelayClient::new(&DownstreamConfig::default()).unwrap();
        assert!(client.url().is_none());
        let outcome = client.relay(&message()).await;
        assert!(matches!(outcome, RelayOutcome::Errored(RelayError::NotConfigured)));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = DownstreamConfig {
            url: Some("not a url".into()),
            ..DownstreamConfig::default()
        };
        assert!(matches!(RelayClient::new(&config), Err(RelayError::InvalidUrl(_))));
    }

    #[test]
    fn test_truncate_for_log() {
        let long = "x".repeat(2000);
        assert_eq!(truncate_for_log(&long).len(), ERROR_BODY_LOG_LIMIT);
        assert_eq!(truncate_for_log("short"), "short");
    }
}
