use plm_core::plm::{PlmBackend, ProjectInfo, SessionToken, UserProjectInfo};
use plm_core::PlmError;
use tracing::instrument;

/// Fetch every project visible to the caller.
///
/// An empty list is returned as-is; deciding whether that is fatal is up to
/// the caller.
#[instrument(skip_all)]
pub async fn get_projects_for_user<B: PlmBackend + ?Sized>(
    backend: &B,
    token: &SessionToken,
) -> Result<Vec<UserProjectInfo>, PlmError> {
    let projects = backend.list_user_projects(token).await?;

    tracing::info!(count = projects.len(), "Available projects");
    for it in &projects {
        tracing::info!(
            project = %it.in_project.name,
            model = %it.in_project.project_model_id,
            "Available project"
        );
    }

    Ok(projects)
}

/// The project the workflow operates on: the first one listed.
pub fn select_project(projects: &[UserProjectInfo]) -> Result<&ProjectInfo, PlmError> {
    projects
        .first()
        .map(|p| &p.in_project)
        .ok_or_else(|| PlmError::empty("no projects found for user"))
}

/// First role the caller is registered as on `project_id`.
///
/// Memberships are fetched again rather than reused. Returns `None` when the
/// caller has no membership on the project; a membership without any role
/// is an empty-result error.
#[instrument(skip(backend, token))]
pub async fn get_user_type_on_project<B: PlmBackend + ?Sized>(
    backend: &B,
    token: &SessionToken,
    project_id: &str,
) -> Result<Option<String>, PlmError> {
    let res = backend.list_user_projects(token).await?;

    let Some(membership) = res
        .into_iter()
        .find(|it| it.in_project.project_model_id == project_id)
    else {
        tracing::warn!("Caller has no membership on project");
        return Ok(None);
    };

    let role = membership.user_registered_as.into_iter().next().ok_or_else(|| {
        PlmError::empty(format!("no role registered on project '{}'", project_id))
    })?;

    tracing::debug!(role = %role, "Resolved user type");
    Ok(Some(role))
}
