use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    Router,
};
use correlation_chain::{
    app::Application, config::Config, correlation, role::Role, telemetry::Metrics,
};
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Starts one service on a random port. `downstream_url` is ignored by the sink.
pub async fn spawn_app(role: Role, downstream_url: Option<&str>) -> Result<TestApp> {
    spawn_app_with_timeout(role, downstream_url, 2000).await
}

pub async fn spawn_app_with_timeout(
    role: Role,
    downstream_url: Option<&str>,
    timeout_milliseconds: u64,
) -> Result<TestApp> {
    let configuration = {
        let mut configuration = Config::build()?;
        configuration.application.host = "127.0.0.1".to_string();
        configuration.application.port = 0;
        configuration.client.timeout_milliseconds = timeout_milliseconds;
        if let Some(url) = downstream_url {
            configuration.gateway.downstream_url = url.to_string();
            configuration.worker.downstream_url = url.to_string();
        }
        configuration
    };

    let metrics = Metrics::build()?;
    let application = Application::build(configuration, role, metrics)
        .await
        .context("Failed to build application.")?;
    let port = application.port();
    let address = format!("http://127.0.0.1:{}", port);
    let _ = tokio::spawn(application.run_until_stopped());

    Ok(TestApp { address })
}

pub struct Chain {
    pub gateway: TestApp,
    pub worker: TestApp,
    pub sink: TestApp,
}

/// gateway → svc-a → svc-b, all real.
pub async fn spawn_chain() -> Result<Chain> {
    let sink = spawn_app(Role::Sink, None).await?;
    let worker = spawn_app(Role::Worker, Some(&sink.url("/final"))).await?;
    let gateway = spawn_app(Role::Gateway, Some(&worker.url("/work"))).await?;

    Ok(Chain {
        gateway,
        worker,
        sink,
    })
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub correlation_id: Option<String>,
    pub correlation_bytes: Option<Vec<u8>>,
}

/// Stand-in for a downstream hop that records what it was sent.
pub struct CaptureServer {
    pub address: String,
    received: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl CaptureServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn received(&self) -> Vec<CapturedRequest> {
        self.received.lock().expect("capture lock poisoned").clone()
    }
}

#[derive(Clone)]
struct CaptureState {
    status: StatusCode,
    received: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn capture(State(state): State<CaptureState>, request: Request) -> StatusCode {
    let inbound = correlation::extract(request.headers());
    let captured = CapturedRequest {
        method: request.method().clone(),
        path: request.uri().path().to_string(),
        correlation_id: inbound.map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
        correlation_bytes: inbound.map(<[u8]>::to_vec),
    };
    state
        .received
        .lock()
        .expect("capture lock poisoned")
        .push(captured);

    state.status
}

pub async fn spawn_capture(status: StatusCode) -> Result<CaptureServer> {
    let received = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new().fallback(capture).with_state(CaptureState {
        status,
        received: received.clone(),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = format!("http://{}", listener.local_addr()?);
    let _ = tokio::spawn(async move { axum::serve(listener, router).await });

    Ok(CaptureServer { address, received })
}

/// Accepts connections and never answers, so every call to it times out.
pub async fn spawn_black_hole() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = format!("http://{}", listener.local_addr()?);
    let _ = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    Ok(address)
}

pub fn correlation_header(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get("x-correlation-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub fn correlation_header_bytes(response: &reqwest::Response) -> Option<Vec<u8>> {
    response
        .headers()
        .get("x-correlation-id")
        .map(|value| value.as_bytes().to_vec())
}

pub fn assert_canonical_identifier(id: &str) {
    assert_eq!(id.len(), 36, "unexpected length for {id}");
    let groups: Vec<_> = id.split('-').map(str::len).collect();
    assert_eq!(groups, vec![8, 4, 4, 4, 12], "unexpected grouping for {id}");
    assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
    assert_eq!(&id[14..15], "4", "version nibble in {id}");
    assert!(
        matches!(&id[19..20], "8" | "9" | "a" | "b"),
        "variant bits in {id}"
    );
}
