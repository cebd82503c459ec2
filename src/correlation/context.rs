//! Request-scoped carrier for the correlation identifier.
//!
//! The boundary middleware attaches the resolved identifier once and runs the
//! rest of the request inside that scope. Everything below it reads the value
//! back with [`current`] or the [`CorrelationScope`] extractor; nothing outside
//! this crate can attach one.

use std::{convert::Infallible, future::Future};

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::CorrelationId;

tokio::task_local! {
    static CURRENT: CorrelationScope;
}

/// Immutable view of the correlation state for one request chain.
#[derive(Debug, Clone, Default)]
pub struct CorrelationScope {
    correlation_id: Option<CorrelationId>,
}

impl CorrelationScope {
    pub fn root() -> Self {
        Self::default()
    }

    /// Derives a child scope carrying `correlation_id`. `self` is untouched.
    pub(crate) fn attach(&self, correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id: Some(correlation_id),
        }
    }

    /// `None` when no identifier was attached anywhere in this scope's ancestry.
    pub fn read(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    /// Text form for log fields and response bodies. Empty when absent.
    pub fn id_or_empty(&self) -> &str {
        self.read().map(CorrelationId::as_str).unwrap_or_default()
    }

    /// Wire form for outbound injection. Empty when absent.
    pub fn bytes_or_empty(&self) -> &[u8] {
        self.read().map(CorrelationId::as_bytes).unwrap_or_default()
    }
}

/// Scope of the request currently being handled on this task.
///
/// Returns the root scope (no identifier) outside of any request.
pub fn current() -> CorrelationScope {
    CURRENT.try_with(Clone::clone).unwrap_or_default()
}

/// Runs `future` with `scope` as the ambient correlation scope.
pub(crate) async fn within<F>(scope: CorrelationScope, future: F) -> F::Output
where
    F: Future,
{
    CURRENT.scope(scope, future).await
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationScope
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CorrelationScope>()
            .cloned()
            .unwrap_or_else(current))
    }
}
