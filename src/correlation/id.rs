use std::fmt;

use axum::body::Bytes;
use uuid::Uuid;

/// Opaque identifier tagging every request caused by one inbound request.
///
/// Never empty. Values generated here are lowercase hyphenated UUIDv4
/// strings; values inherited from a caller are kept byte for byte and only
/// rendered lossily as text for logs and response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId {
    raw: Bytes,
    text: String,
}

impl CorrelationId {
    pub fn generate() -> Self {
        let text = Uuid::new_v4().hyphenated().to_string();
        Self {
            raw: Bytes::from(text.clone()),
            text,
        }
    }

    fn inherited(value: &[u8]) -> Self {
        Self {
            raw: Bytes::copy_from_slice(value),
            text: String::from_utf8_lossy(value).into_owned(),
        }
    }

    /// Exact bytes carried on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Reuses the inbound value when it has any non-whitespace content,
/// otherwise generates a fresh identifier.
///
/// Inherited values are trusted as-is: no format or encoding check is
/// applied to identifiers this process did not originate.
pub fn resolve_or_create(inbound: Option<&[u8]>) -> CorrelationId {
    match inbound.map(<[u8]>::trim_ascii) {
        Some(value) if !value.is_empty() => CorrelationId::inherited(value),
        _ => CorrelationId::generate(),
    }
}
