use axum::{
    Router,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{file_node::FileNode, project::Project};
use deployment::Deployment;
use serde::Deserialize;
use services::services::projects::{CreateFileRequest, RenameFileRequest, UpdateFileRequest};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    DeploymentImpl,
    error::ApiError,
    session::{CurrentUser, Viewer},
};

#[derive(Debug, Deserialize)]
pub struct FilePathQuery {
    pub path: String,
}

/// GET /api/projects/{id}/files?path=/index.html
pub async fn get_file(
    State(deployment): State<DeploymentImpl>,
    viewer: Viewer,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<FilePathQuery>, QueryRejection>,
) -> Result<ResponseJson<ApiResponse<FileNode>>, ApiError> {
    let Path(id) = id?;
    let Query(query) = query?;
    let file = deployment
        .projects()
        .read_file(viewer.user_id(), id, &query.path)
        .await?;
    Ok(ResponseJson(ApiResponse::success(file)))
}

/// POST /api/projects/{id}/files
pub async fn create_file(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CreateFileRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let project = deployment
        .projects()
        .create_file(current.user.id, id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

/// PUT /api/projects/{id}/files
pub async fn update_file(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateFileRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let project = deployment
        .projects()
        .write_file(current.user.id, id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

/// DELETE /api/projects/{id}/files?path=/old.html
pub async fn delete_file(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<FilePathQuery>, QueryRejection>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let Path(id) = id?;
    let Query(query) = query?;
    let project = deployment
        .projects()
        .delete_file(current.user.id, id, &query.path)
        .await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

/// POST /api/projects/{id}/files/rename
pub async fn rename_file(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RenameFileRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let project = deployment
        .projects()
        .rename_file(current.user.id, id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/projects/{id}/files",
        Router::new()
            .route(
                "/",
                get(get_file)
                    .post(create_file)
                    .put(update_file)
                    .delete(delete_file),
            )
            .route("/rename", post(rename_file)),
    )
}
