use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{serve::Serve, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::{api, config::Config, downstream::Downstream, role::Role, telemetry::Metrics};

pub struct Application {
    port: u16,
    server: Serve<Router, Router>,
}

impl Application {
    pub async fn build(configuration: Config, role: Role, metrics: Metrics) -> Result<Self> {
        let address = configuration.application.address();
        let listener = TcpListener::bind(&address)
            .await
            .context("Failed to bind address")?;
        let port = listener
            .local_addr()
            .context("Failed to get local address")?
            .port();

        let client = reqwest::Client::builder()
            .timeout(configuration.client.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let downstream = role
            .downstream_name()
            .zip(role.hop_config(&configuration))
            .map(|(target, hop)| Downstream::new(client, target, hop));

        match &downstream {
            Some(downstream) => info!(
                "{} listening on {}, {} URL: {}",
                role.service_name(),
                address,
                downstream.target(),
                downstream.url()
            ),
            None => info!("{} listening on {}", role.service_name(), address),
        }

        let router = api::create_router(
            role,
            downstream,
            Arc::new(metrics),
            configuration.application.request_timeout(),
        )?;
        let server = axum::serve(listener, router);

        Ok(Self { port, server })
    }

    pub async fn run_until_stopped(self) -> Result<()> {
        self.server.await.context("Server failed to start")
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
