mod context;
mod id;
mod propagation;

pub use context::{current, CorrelationScope};
pub(crate) use context::within;
pub use id::{resolve_or_create, CorrelationId};
pub use propagation::{extract, inject, CORRELATION_ID_HEADER};
