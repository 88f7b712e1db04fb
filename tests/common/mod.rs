//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::Value;
use story_relay::config::RelayConfig;
use story_relay::http::HttpServer;
use story_relay::lifecycle::Shutdown;
use tokio::net::TcpListener;
use wiremock::MockServer;

pub const HOOK_PATH: &str = "/hooks/agent";
pub const HOOK_TOKEN: &str = "integration-token";

/// A relay serving on an ephemeral port.
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningRelay {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Relay config pointing at `hook`.
pub fn config_for(hook: &MockServer) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.downstream.url = Some(format!("{}{}", hook.uri(), HOOK_PATH));
    config.downstream.token = HOOK_TOKEN.into();
    config.downstream.recipient = "1001".into();
    config
}

/// Start the relay with `config` and wait until it accepts connections.
pub async fn start_relay(config: RelayConfig) -> RunningRelay {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // The listener is already bound; give the accept loop a moment.
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningRelay { addr, shutdown }
}

/// Client that never reuses connections or goes through a proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Bodies of every request the mock hook received.
#[allow(dead_code)]
pub async fn hook_bodies(hook: &MockServer) -> Vec<Value> {
    hook.received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|req| serde_json::from_slice(&req.body).unwrap())
        .collect()
}
