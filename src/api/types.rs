use std::sync::Arc;

use crate::{downstream::Downstream, role::Role, telemetry::Metrics};

/// State shared by the handlers of a relaying hop.
pub struct AppState {
    pub role: Role,
    pub downstream: Downstream,
    pub metrics: Arc<Metrics>,
}
