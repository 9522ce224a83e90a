use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, runtime, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Logging options for a command-line process.
#[derive(Debug, Clone, Default)]
pub struct LogOptions<'a> {
    pub service_name: &'a str,
    /// Fallback filter when `RUST_LOG` is not set.
    pub log_level: &'a str,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
    /// Export spans over OTLP/gRPC when set.
    pub otlp_endpoint: Option<&'a str>,
}

/// Install the global subscriber.
///
/// Log output always goes to stderr so stdout stays reserved for program
/// output. A failing OTLP exporter is reported and skipped.
pub fn init_tracing(options: &LogOptions<'_>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(options.log_level));

    let telemetry = options
        .otlp_endpoint
        .and_then(|endpoint| otlp_tracer(options.service_name, endpoint))
        .map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let json_layer = options.json.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .json()
            .flatten_event(true)
    });

    let text_layer = (!options.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(telemetry)
        .with(json_layer)
        .with(text_layer)
        .try_init();

    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}

fn otlp_tracer(service_name: &str, otlp_endpoint: &str) -> Option<sdktrace::Tracer> {
    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    match opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::TokioCurrentThread)
    {
        Ok(tracer) => Some(tracer),
        Err(e) => {
            eprintln!(
                "Failed to initialize OTLP tracer for '{}' at endpoint '{}': {}",
                service_name, otlp_endpoint, e
            );
            None
        }
    }
}

/// Flush pending spans. Call once before the process exits.
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
}
