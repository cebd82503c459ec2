use anyhow::Result;
use correlation_chain::role::Role;
use reqwest::StatusCode;

use crate::helpers::{spawn_app, spawn_capture};

#[tokio::test]
async fn metrics_endpoint_returns_200() -> Result<()> {
    // Arrange
    let app = spawn_app(Role::Sink, None).await?;
    let client = reqwest::Client::new();

    // Act
    let response = client.get(app.url("/metrics")).send().await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn metrics_count_downstream_calls() -> Result<()> {
    // Arrange
    let svc_a = spawn_capture(StatusCode::OK).await?;
    let app = spawn_app(Role::Gateway, Some(&svc_a.url("/work"))).await?;
    let client = reqwest::Client::new();
    client.get(app.url("/do")).send().await?;

    // Act
    let response = client.get(app.url("/metrics")).send().await?;

    // Assert
    let body = response.text().await?;
    let line = body
        .lines()
        .find(|line| line.starts_with("downstream_requests_total{"))
        .expect("downstream counter not exported");
    assert!(line.contains(r#"target="svc-a""#));
    assert!(line.contains(r#"outcome="succeeded""#));
    assert!(line.ends_with(" 1"));

    Ok(())
}
