mod correlation;
mod record_metrics;
mod tracing;

pub use self::correlation::correlate;
pub use self::record_metrics::record_metrics;
pub use self::tracing::{log_request, make_request_span};
