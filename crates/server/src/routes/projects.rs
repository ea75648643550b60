use axum::{
    Router,
    body::Bytes,
    extract::{
        Json, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::header,
    response::{IntoResponse, Json as ResponseJson},
    routing::{get, post},
};
use db::models::project::{CreateProject, Project, UpdateProject, UserProjectStats};
use deployment::Deployment;
use services::services::projects::LikeStatus;
use tracing::info;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    DeploymentImpl,
    error::ApiError,
    session::{CurrentUser, Viewer},
};

/// GET /api/projects
pub async fn list_projects(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = deployment.projects().list_for_user(current.user.id).await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

/// POST /api/projects
pub async fn create_project(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    payload: Result<Json<CreateProject>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let Json(payload) = payload?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    let project = deployment.projects().create(current.user.id, payload).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

/// GET /api/projects/public
pub async fn list_public_projects(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = deployment.projects().list_public().await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

/// GET /api/projects/templates
pub async fn list_template_projects(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = deployment.projects().list_templates().await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

/// GET /api/projects/likes
/// Ids of the projects the current user has liked.
pub async fn list_liked_projects(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<Uuid>>>, ApiError> {
    let ids = deployment.projects().liked_project_ids(current.user.id).await?;
    Ok(ResponseJson(ApiResponse::success(ids)))
}

/// GET /api/projects/stats
pub async fn get_stats(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
) -> Result<ResponseJson<ApiResponse<UserProjectStats>>, ApiError> {
    let stats = deployment.projects().stats(current.user.id).await?;
    Ok(ResponseJson(ApiResponse::success(stats)))
}

/// GET /api/projects/{id}
pub async fn get_project(
    State(deployment): State<DeploymentImpl>,
    viewer: Viewer,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let Path(id) = id?;
    let project = deployment.projects().get(viewer.user_id(), id).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

/// PUT /api/projects/{id}
pub async fn update_project(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateProject>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let project = deployment
        .projects()
        .update(current.user.id, id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

/// DELETE /api/projects/{id}
pub async fn delete_project(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let Path(id) = id?;
    deployment.projects().delete(current.user.id, id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// POST /api/projects/{id}/download
pub async fn download_project(
    State(deployment): State<DeploymentImpl>,
    viewer: Viewer,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let Path(id) = id?;
    let project = deployment
        .projects()
        .record_download(viewer.user_id(), id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

/// POST /api/projects/{id}/like
pub async fn toggle_like(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ResponseJson<ApiResponse<LikeStatus>>, ApiError> {
    let Path(id) = id?;
    let status = deployment.projects().toggle_like(current.user.id, id).await?;
    Ok(ResponseJson(ApiResponse::success(status)))
}

/// POST /api/projects/{id}/star
pub async fn toggle_star(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let Path(id) = id?;
    let project = deployment.projects().toggle_star(current.user.id, id).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

/// GET /api/projects/{id}/export
/// The project as a downloadable `<name>.json` document.
pub async fn export_project(
    State(deployment): State<DeploymentImpl>,
    viewer: Viewer,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let document = deployment
        .project_transfer()
        .export(viewer.user_id(), id)
        .await?;
    let body = document.to_pretty_json()?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.file_name()),
            ),
        ],
        body,
    ))
}

/// POST /api/projects/import
/// Accepts an exported document; only its `files` array is required.
pub async fn import_project(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    body: Bytes,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = deployment
        .project_transfer()
        .import(current.user.id, &body)
        .await?;
    info!(project_id = %project.id, user_id = %current.user.id, "Project imported");
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    let project_id_router = Router::new()
        .route(
            "/",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/download", post(download_project))
        .route("/like", post(toggle_like))
        .route("/star", post(toggle_star))
        .route("/export", get(export_project));

    let projects_router = Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/public", get(list_public_projects))
        .route("/templates", get(list_template_projects))
        .route("/likes", get(list_liked_projects))
        .route("/stats", get(get_stats))
        .route("/import", post(import_project))
        .nest("/{id}", project_id_router);

    Router::new().nest("/projects", projects_router)
}
