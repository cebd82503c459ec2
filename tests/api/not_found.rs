use anyhow::Result;
use correlation_chain::role::Role;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::helpers::{correlation_header, spawn_app};

#[tokio::test]
async fn not_found_returns_404() -> Result<()> {
    // Arrange
    let app = spawn_app(Role::Sink, None).await?;
    let client = reqwest::Client::new();
    let random_path = Uuid::new_v4().to_string();

    // Act
    let response = client
        .get(app.url(&format!("/{random_path}")))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn not_found_still_reflects_identifier() -> Result<()> {
    // Arrange
    let app = spawn_app(Role::Sink, None).await?;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(app.url("/do"))
        .header("X-Correlation-Id", "abc-123")
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(correlation_header(&response).as_deref(), Some("abc-123"));

    Ok(())
}
