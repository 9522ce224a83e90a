//! W3C Trace Context propagation for outbound backend calls.
//!
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::HeaderMap;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Header name for W3C traceparent
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Header name for W3C tracestate
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Header name for request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Inject the current span's trace context into `headers`.
///
/// Nothing is written unless an OpenTelemetry layer is installed and the
/// current span carries a valid context.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let context = Span::current().context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return;
    }

    // version-trace_id-span_id-trace_flags
    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );
    if let Ok(value) = traceparent.parse() {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty()
        && let Ok(value) = tracestate.parse()
    {
        headers.insert(TRACESTATE_HEADER, value);
    }
}

/// Headers attached to every backend call of one run.
pub fn correlation_headers(request_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    inject_trace_context(&mut headers);

    if let Ok(value) = request_id.parse() {
        headers.insert(REQUEST_ID_HEADER, value);
    }

    headers
}

/// Extension trait for reqwest's builder to attach correlation headers.
pub trait TracedRequestExt {
    fn traced(self, request_id: &str) -> Self;
}

impl TracedRequestExt for reqwest::RequestBuilder {
    fn traced(self, request_id: &str) -> Self {
        self.headers(correlation_headers(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_traceparent_without_active_span() {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);
        assert!(headers.is_empty());
    }

    #[test]
    fn request_id_is_always_attached() {
        let headers = correlation_headers("run-42");
        assert_eq!(headers.get(REQUEST_ID_HEADER).unwrap(), "run-42");
        assert!(headers.get(TRACEPARENT_HEADER).is_none());
    }

    #[test]
    fn invalid_request_id_is_skipped() {
        let headers = correlation_headers("bad\nid");
        assert!(headers.get(REQUEST_ID_HEADER).is_none());
    }
}
