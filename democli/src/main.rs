use democli::config::get_configuration;
use democli::report::write_samples;
use dotenvy::dotenv;
use plm_core::observability::{init_tracing, shutdown_tracing, LogOptions};
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();

    let settings = match get_configuration() {
        Ok(settings) => settings,
        Err(e) => {
            println!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    init_tracing(&LogOptions {
        service_name: "democli",
        log_level: &settings.logging.level,
        json: settings.logging.json,
        otlp_endpoint: settings.logging.otlp_endpoint.as_deref(),
    });

    // First argument overrides the configured properties file.
    let properties_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.properties_path.clone());

    let mut stdout = std::io::stdout();
    let code = match democli::run(&settings, &properties_path, &mut stdout).await {
        Ok(report) => match write_samples(&report.samples, &mut stdout) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Failed to write report: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            println!("{}", e);
            ExitCode::from(e.exit_code())
        }
    };

    shutdown_tracing();
    code
}
