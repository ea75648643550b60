use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::project::Project;
use deployment::Deployment;
use services::services::templates::{self, Template, TemplateSummary};
use tracing::info;
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError, session::CurrentUser};

/// GET /api/templates
pub async fn list_templates() -> ResponseJson<ApiResponse<Vec<TemplateSummary>>> {
    ResponseJson(ApiResponse::success(templates::list()))
}

/// GET /api/templates/{id}
pub async fn get_template(
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Template>>, ApiError> {
    let template = templates::get(&id).ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;
    Ok(ResponseJson(ApiResponse::success(template)))
}

/// POST /api/templates/{id}/use
/// Copies the template into a new project owned by the caller.
pub async fn use_template(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let template = templates::get(&id).ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;
    let project = deployment
        .projects()
        .create(current.user.id, template.to_create_project())
        .await?;

    info!(template_id = %id, project_id = %project.id, "Project created from template");
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/templates",
        Router::new()
            .route("/", get(list_templates))
            .route("/{id}", get(get_template))
            .route("/{id}/use", post(use_template)),
    )
}
