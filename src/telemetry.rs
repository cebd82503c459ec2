mod metrics;
mod tracing;

pub use self::metrics::{DownstreamOutcome, Metrics};
pub use self::tracing::{init_subscribers, TracingGuard};
