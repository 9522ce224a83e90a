pub mod logging;
pub mod trace_context;

pub use logging::{LogOptions, init_tracing, shutdown_tracing};
pub use trace_context::{
    REQUEST_ID_HEADER, TRACEPARENT_HEADER, TRACESTATE_HEADER, TracedRequestExt,
    correlation_headers, inject_trace_context,
};
