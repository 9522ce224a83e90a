pub mod config;
pub mod models;
pub mod report;
pub mod services;
pub mod workflow;

use crate::config::Settings;
use crate::models::WorkflowReport;
use plm_core::config::{load_properties, Credentials};
use plm_core::plm::HttpPlmBackend;
use plm_core::PlmError;
use std::io::Write;
use std::path::Path;

/// Read credentials from `properties_path` and run the workflow against the
/// HTTP backend described by `settings`. Progress output goes to `out`.
pub async fn run(
    settings: &Settings,
    properties_path: &Path,
    out: &mut dyn Write,
) -> Result<WorkflowReport, PlmError> {
    let props = load_properties(properties_path)?;
    let credentials = Credentials::from_properties(&props)?;

    let backend = HttpPlmBackend::new(&settings.backend)?;
    tracing::debug!(
        base_url = %settings.backend.base_url,
        request_id = %backend.request_id(),
        "Using PLM backend"
    );

    workflow::run(&backend, &credentials, &settings.backend, &settings.workflow, out).await
}
