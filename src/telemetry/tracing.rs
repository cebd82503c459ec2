use anyhow::Result;
use tokio::{spawn, task::JoinHandle};
use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_loki::BackgroundTask;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};
use tracing_subscriber::{registry::LookupSpan, Layer};
use url::Url;

pub struct TracingGuard {
    loki_handle: Option<JoinHandle<()>>,
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.loki_handle.take() {
            handle.abort();
        }
    }
}

/// Installs the process-wide subscriber. Call once, from `main`.
pub fn init_subscribers(service_name: &str) -> Result<TracingGuard> {
    // Filter
    let env_filter = build_env_filter_layer();

    // Layers
    let logger_layer = build_logger_layer(LogFormat::from_env());
    let loki = build_loki_layer(service_name)?;
    let (loki_layer, background_task) = match loki {
        Some((layer, task)) => (Some(layer), Some(task)),
        None => (None, None),
    };

    // Subscriber
    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(logger_layer)
        .with(loki_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    let loki_handle = background_task.map(spawn);

    Ok(TracingGuard { loki_handle })
}

fn build_env_filter_layer() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(std::env::var("RUST_LOG").unwrap_or_else(|_| LevelFilter::INFO.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn build_logger_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true);

    match format {
        LogFormat::Json => Box::new(layer.json().with_current_span(true).with_span_list(false)),
        LogFormat::Text => Box::new(layer.compact()),
    }
}

/// Ships logs to Loki only when `LOGGING_LOKI_URL` is set.
fn build_loki_layer(service_name: &str) -> Result<Option<(tracing_loki::Layer, BackgroundTask)>> {
    let Ok(loki_url) = std::env::var("LOGGING_LOKI_URL") else {
        return Ok(None);
    };
    if loki_url.is_empty() {
        return Ok(None);
    }

    let (loki_layer, background_task) = tracing_loki::builder()
        .label("service_name", service_name)?
        .label("version", env!("CARGO_PKG_VERSION"))?
        .label(
            "environment",
            std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()),
        )?
        .build_url(Url::parse(&loki_url)?)?;

    Ok(Some((loki_layer, background_task)))
}
