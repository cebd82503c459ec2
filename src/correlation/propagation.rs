use axum::http::{header::HeaderName, HeaderMap, HeaderValue};

pub static CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// Raw bytes of the first inbound correlation value, if any.
///
/// No decoding happens here, so an inherited identifier travels on
/// unchanged even when it is not valid UTF-8.
pub fn extract(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get(&CORRELATION_ID_HEADER)
        .map(HeaderValue::as_bytes)
}

/// Sets the correlation header on an outbound header map.
///
/// An empty identifier leaves the map unmodified.
pub fn inject(headers: &mut HeaderMap, correlation_id: &[u8]) {
    if correlation_id.is_empty() {
        return;
    }

    match HeaderValue::from_bytes(correlation_id) {
        Ok(value) => {
            headers.insert(CORRELATION_ID_HEADER.clone(), value);
        }
        Err(_) => {
            tracing::warn!(
                correlation_id = %String::from_utf8_lossy(correlation_id),
                "correlation id is not a valid header value, not propagating"
            );
        }
    }
}
