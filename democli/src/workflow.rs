//! Session-scoped sensor data workflow.
//!
//! The stages run strictly one after another, each feeding the next:
//!
//! ```text
//! login -> projects -> role -> container search -> sensor page -> logout
//! ```
//!
//! Once login succeeds the session is always logged out, whether the later
//! stages succeed or fail.

use crate::config::WorkflowSettings;
use crate::models::WorkflowReport;
use crate::report;
use crate::services::{breakdown, projects, session};
use plm_core::config::{BackendSettings, Credentials};
use plm_core::plm::{PlmBackend, SessionToken};
use plm_core::PlmError;
use std::io::Write;
use tracing::instrument;
use validator::Validate;

#[instrument(skip_all, fields(user = %credentials.login_name))]
pub async fn run<B: PlmBackend + ?Sized>(
    backend: &B,
    credentials: &Credentials,
    backend_settings: &BackendSettings,
    settings: &WorkflowSettings,
    out: &mut dyn Write,
) -> Result<WorkflowReport, PlmError> {
    // Nothing reaches the backend with settings a later stage would reject.
    settings.validate()?;

    let session = session::login(
        backend,
        credentials,
        &backend_settings.edm_server,
        backend_settings.edm_port,
    )
    .await?;

    let outcome = run_stages(backend, session.token(), settings, out).await;

    if let Err(e) = session.logout().await {
        tracing::warn!(error = %e, "Logout failed");
    }

    if let Err(e) = &outcome {
        tracing::error!(error = %e, "Workflow aborted");
    }
    outcome
}

async fn run_stages<B: PlmBackend + ?Sized>(
    backend: &B,
    token: &SessionToken,
    settings: &WorkflowSettings,
    out: &mut dyn Write,
) -> Result<WorkflowReport, PlmError> {
    let projects = projects::get_projects_for_user(backend, token).await?;
    // Shown even if a later stage fails.
    if let Err(e) = report::write_projects(&projects, out) {
        tracing::warn!(error = %e, "Failed to print project listing");
    }
    let project = projects::select_project(&projects)?.clone();

    let role = projects::get_user_type_on_project(backend, token, &project.project_model_id)
        .await?
        .ok_or_else(|| {
            PlmError::empty(format!(
                "no membership found on project '{}'",
                project.project_model_id
            ))
        })?;

    // A single element is expected to match.
    let container = breakdown::search_for_sensor_data_container(
        backend,
        token,
        &project.project_model_id,
        &settings.repository,
        &role,
        &settings.search,
    )
    .await?;

    let samples = breakdown::retrieve_sensor_data(
        backend,
        token,
        &settings.repository,
        &project.project_model_id,
        &container.instance_id,
        &settings.sensor,
    )
    .await?;

    Ok(WorkflowReport {
        projects,
        project,
        role,
        container,
        samples,
    })
}
