use anyhow::Result;
use prometheus::{
    register_counter_vec_with_registry, register_gauge_vec_with_registry,
    register_histogram_vec_with_registry, Counter, CounterVec, Encoder, Gauge, GaugeVec,
    Histogram, HistogramVec, Registry, TextEncoder,
};

/// How a downstream call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownstreamOutcome {
    Succeeded,
    TransportFailed,
    BuildFailed,
}

impl DownstreamOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownstreamOutcome::Succeeded => "succeeded",
            DownstreamOutcome::TransportFailed => "transport_failed",
            DownstreamOutcome::BuildFailed => "build_failed",
        }
    }
}

pub struct Metrics {
    pub registry: Registry,

    http_requests_pending: GaugeVec,
    http_requests_total: CounterVec,
    http_requests_duration_seconds: HistogramVec,
    downstream_requests_total: CounterVec,
    downstream_request_duration_seconds: HistogramVec,
}

impl Metrics {
    pub fn build() -> Result<Self> {
        let registry = Registry::default();

        let http_requests_pending = register_gauge_vec_with_registry!(
            "http_requests_pending",
            "Total number of HTTP requests in progress",
            &["method", "endpoint"],
            &registry
        )?;
        let http_requests_total = register_counter_vec_with_registry!(
            "http_requests_total",
            "Total number of HTTP requests",
            &["method", "endpoint", "status"],
            &registry
        )?;
        let http_requests_duration_seconds = register_histogram_vec_with_registry!(
            "http_requests_duration_seconds",
            "Duration of HTTP requests in seconds",
            &["method", "endpoint", "status"],
            &registry
        )?;
        let downstream_requests_total = register_counter_vec_with_registry!(
            "downstream_requests_total",
            "Total number of calls made to the next hop",
            &["target", "outcome"],
            &registry
        )?;
        let downstream_request_duration_seconds = register_histogram_vec_with_registry!(
            "downstream_request_duration_seconds",
            "Duration of calls made to the next hop in seconds",
            &["target"],
            &registry
        )?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_pending,
            http_requests_duration_seconds,
            downstream_requests_total,
            downstream_request_duration_seconds,
        })
    }

    pub fn http_requests_pending(&self, method: &str, endpoint: &str) -> Gauge {
        self.http_requests_pending
            .with_label_values(&[method, endpoint])
    }

    pub fn http_requests_total(&self, method: &str, endpoint: &str, status: &str) -> Counter {
        self.http_requests_total
            .with_label_values(&[method, endpoint, status])
    }

    pub fn http_requests_duration_seconds(
        &self,
        method: &str,
        endpoint: &str,
        status: &str,
    ) -> Histogram {
        self.http_requests_duration_seconds
            .with_label_values(&[method, endpoint, status])
    }

    pub fn downstream_requests_total(&self, target: &str, outcome: DownstreamOutcome) -> Counter {
        self.downstream_requests_total
            .with_label_values(&[target, outcome.as_str()])
    }

    pub fn downstream_request_duration_seconds(&self, target: &str) -> Histogram {
        self.downstream_request_duration_seconds
            .with_label_values(&[target])
    }

    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
