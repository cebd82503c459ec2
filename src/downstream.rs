//! The single outbound call a relaying hop makes per request.
//!
//! A call moves through `Idle → RequestBuilt → Dispatched` and ends either
//! `Succeeded` (any HTTP response, whatever its status) or `TransportFailed`.
//! Failing to build the request ends it before anything is sent. Nothing is
//! retried.

use axum::http::{Method, StatusCode};
use tokio::time::Instant;
use tracing::{error, info, instrument};
use url::Url;

use crate::{
    config::HopConfig,
    correlation::{self, CorrelationScope},
    error::Error,
    telemetry::{DownstreamOutcome, Metrics},
};

#[derive(Debug, Clone)]
pub struct Downstream {
    client: reqwest::Client,
    target: &'static str,
    url: String,
    method: String,
}

impl Downstream {
    pub fn new(client: reqwest::Client, target: &'static str, hop: &HopConfig) -> Self {
        Self {
            client,
            target,
            url: hop.downstream_url.clone(),
            method: hop.downstream_method.clone(),
        }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Idle → RequestBuilt.
    pub fn build_request(&self) -> Result<reqwest::Request, Error> {
        let method = Method::from_bytes(self.method.as_bytes()).map_err(|err| {
            Error::RequestBuild(format!("invalid method {:?}: {err}", self.method))
        })?;
        let url = Url::parse(&self.url)
            .map_err(|err| Error::RequestBuild(format!("invalid url {:?}: {err}", self.url)))?;

        self.client
            .request(method, url)
            .build()
            .map_err(|err| Error::RequestBuild(err.to_string()))
    }

    /// RequestBuilt → Dispatched → Succeeded | TransportFailed.
    ///
    /// The correlation id is injected here, immediately before sending.
    pub async fn dispatch(
        &self,
        mut request: reqwest::Request,
        correlation_id: &[u8],
    ) -> Result<StatusCode, Error> {
        correlation::inject(request.headers_mut(), correlation_id);

        match self.client.execute(request).await {
            Ok(response) => Ok(response.status()),
            // reqwest defers some validation (e.g. unsupported schemes) to send time.
            Err(err) if err.is_builder() => Err(Error::RequestBuild(err.to_string())),
            Err(err) => Err(Error::Transport {
                target: self.target.to_string(),
                url: self.url.clone(),
                source: err,
            }),
        }
    }

    /// Runs the whole call, logging and counting exactly one outcome.
    #[instrument(name = "downstream_call", skip_all, fields(downstream = self.target))]
    pub async fn call(
        &self,
        scope: &CorrelationScope,
        metrics: &Metrics,
    ) -> Result<StatusCode, Error> {
        let correlation_id = scope.id_or_empty();
        let start = Instant::now();
        let result = match self.build_request() {
            Ok(request) => self.dispatch(request, scope.bytes_or_empty()).await,
            Err(err) => Err(err),
        };
        metrics
            .downstream_request_duration_seconds(self.target)
            .observe(start.elapsed().as_secs_f64());

        let outcome = match &result {
            Ok(status) => {
                info!(
                    correlation_id,
                    status = status.as_u16(),
                    "{} responded with status {}",
                    self.target,
                    status.as_u16()
                );
                DownstreamOutcome::Succeeded
            }
            Err(err @ Error::Transport { .. }) => {
                error!(
                    correlation_id,
                    url = %self.url,
                    error = %err,
                    "{} request failed",
                    self.target
                );
                DownstreamOutcome::TransportFailed
            }
            Err(err) => {
                error!(
                    correlation_id,
                    url = %self.url,
                    error = %err,
                    "failed to create request to {}",
                    self.target
                );
                DownstreamOutcome::BuildFailed
            }
        };
        metrics.downstream_requests_total(self.target, outcome).inc();

        result
    }
}
