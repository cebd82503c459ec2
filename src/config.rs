use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_aux::prelude::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub application: ApplicationConfig,
    pub gateway: HopConfig,
    pub worker: HopConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    pub name: String,
    pub version: String,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// Upper bound on handling one inbound request, downstream call included.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_milliseconds: u64,
}

/// Where a relaying hop sends its one downstream call.
///
/// Both fields are kept as raw strings and parsed per request, so a bad
/// value surfaces as a failed call rather than a failed boot.
#[derive(Debug, Clone, Deserialize)]
pub struct HopConfig {
    pub downstream_url: String,
    pub downstream_method: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl ApplicationConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_milliseconds)
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl Config {
    pub fn build() -> Result<Self> {
        let base_path = std::env::current_dir().context("Failed to determine current directory")?;
        let configuration_directory = base_path.join("configs");

        let environment = Environment::try_from(
            std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "dev".into()),
        )
        .map_err(anyhow::Error::msg)
        .context("Failed to parse APP_ENVIRONMENT")?;
        let environment_filename = format!("{}.toml", environment.as_str());

        let mut settings = config::Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 8080)?
            .set_default("application.request_timeout_milliseconds", 10000)?
            .set_default("gateway.downstream_url", "http://svc-a:8080/work")?
            .set_default("gateway.downstream_method", "GET")?
            .set_default("worker.downstream_url", "http://svc-b:8080/final")?
            .set_default("worker.downstream_method", "POST")?
            .set_default("client.timeout_milliseconds", 5000)?
            .add_source(
                config::File::from(configuration_directory.join("base.toml")).required(false),
            )
            .add_source(
                config::File::from(configuration_directory.join(environment_filename))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override("application.name", env!("CARGO_PKG_NAME"))?
            .set_override("application.version", env!("CARGO_PKG_VERSION"))?;

        if let Some(addr) = get_env_var("ADDR") {
            let (host, port) = split_listen_address(&addr)?;
            settings = settings
                .set_override("application.host", host)?
                .set_override("application.port", i64::from(port))?;
        }
        if let Some(url) = get_env_var("SVC_A_URL") {
            settings = settings.set_override("gateway.downstream_url", url)?;
        }
        if let Some(url) = get_env_var("SVC_B_URL") {
            settings = settings.set_override("worker.downstream_url", url)?;
        }

        let settings = settings.build().context("Failed to build configuration")?;

        settings
            .try_deserialize::<Config>()
            .context("Failed to deserialize configuration")
    }
}

fn get_env_var(name: &str) -> Option<String> {
    let var = std::env::var(name).ok()?;
    if var.is_empty() {
        return None;
    }
    Some(var)
}

/// Accepts `host:port` or the bare `:port` form, which listens on all interfaces.
fn split_listen_address(addr: &str) -> Result<(String, u16)> {
    let (host, port) = addr
        .rsplit_once(':')
        .with_context(|| format!("ADDR must be host:port, got {addr:?}"))?;
    let port = port
        .parse::<u16>()
        .with_context(|| format!("ADDR has an invalid port, got {addr:?}"))?;
    let host = match host {
        "" => "0.0.0.0".to_string(),
        host => host.trim_start_matches('[').trim_end_matches(']').to_string(),
    };

    Ok((host, port))
}

pub enum Environment {
    Development,
    Production,
    Staging,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Production => "production",
            Environment::Staging => "staging",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "dev" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            other => Err(format!("{} is not a valid environment", other)),
        }
    }
}
