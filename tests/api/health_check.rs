use anyhow::Result;
use correlation_chain::role::Role;
use reqwest::StatusCode;

use crate::helpers::{assert_canonical_identifier, correlation_header, spawn_app};

#[tokio::test]
async fn health_check_works() -> Result<()> {
    // Arrange
    let app = spawn_app(Role::Sink, None).await?;
    let client = reqwest::Client::new();

    // Act
    let response = client.get(app.url("/health")).send().await?;

    // Assert
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(Some(0), response.content_length());

    Ok(())
}

#[tokio::test]
async fn ping_answers_ok_with_identifier() -> Result<()> {
    // Arrange
    let app = spawn_app(Role::Gateway, Some("http://127.0.0.1:9/work")).await?;
    let client = reqwest::Client::new();

    // Act
    let response = client.get(app.url("/ping")).send().await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let id = correlation_header(&response).expect("missing correlation header");
    assert_canonical_identifier(&id);
    assert_eq!(response.text().await?, "ok\n");

    Ok(())
}

#[tokio::test]
async fn ping_reflects_inbound_identifier() -> Result<()> {
    // Arrange
    let app = spawn_app(Role::Worker, Some("http://127.0.0.1:9/final")).await?;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(app.url("/ping"))
        .header("X-Correlation-Id", "abc-123")
        .send()
        .await?;

    // Assert
    assert_eq!(correlation_header(&response).as_deref(), Some("abc-123"));

    Ok(())
}
