use axum::routing::MethodFilter;

use crate::config::{Config, HopConfig};

/// Position of a service in the gateway → svc-a → svc-b chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Public edge. `GET /do`, calls svc-a.
    Gateway,
    /// Intermediate hop. `/work`, calls svc-b.
    Worker,
    /// End of the chain. `POST /final`, no downstream call.
    Sink,
}

impl Role {
    pub fn service_name(&self) -> &'static str {
        match self {
            Role::Gateway => "gateway",
            Role::Worker => "svc-a",
            Role::Sink => "svc-b",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Role::Gateway => "/do",
            Role::Worker => "/work",
            Role::Sink => "/final",
        }
    }

    /// Methods served on [`Role::endpoint`].
    pub fn method_filter(&self) -> MethodFilter {
        match self {
            Role::Gateway => MethodFilter::GET,
            Role::Worker => MethodFilter::GET.or(MethodFilter::POST),
            Role::Sink => MethodFilter::POST,
        }
    }

    /// Name of the next hop, used in logs, error messages and metric labels.
    pub fn downstream_name(&self) -> Option<&'static str> {
        match self {
            Role::Gateway => Some(Role::Worker.service_name()),
            Role::Worker => Some(Role::Sink.service_name()),
            Role::Sink => None,
        }
    }

    pub fn hop_config<'a>(&self, config: &'a Config) -> Option<&'a HopConfig> {
        match self {
            Role::Gateway => Some(&config.gateway),
            Role::Worker => Some(&config.worker),
            Role::Sink => None,
        }
    }

    /// Body written once the handler has finished its work.
    pub fn completion_body(&self, correlation_id: &str) -> String {
        match self {
            Role::Gateway => format!("gateway -> svc-a ok (corr={correlation_id})\n"),
            Role::Worker => format!("svc-a done (corr={correlation_id})\n"),
            Role::Sink => format!("svc-b ok (corr={correlation_id})\n"),
        }
    }
}
