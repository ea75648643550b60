use axum::{
    Router,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::header,
    response::{Html, IntoResponse, Json as ResponseJson},
    routing::get,
};
use db::models::published_site::{PublishedSite, UpdatePublishedSite};
use deployment::Deployment;
use serde::Deserialize;
use services::services::publishing::PublishRequest;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    DeploymentImpl,
    error::ApiError,
    session::{CurrentUser, Viewer},
};

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub name: String,
}

/// GET /api/sites
pub async fn list_sites(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<PublishedSite>>>, ApiError> {
    let sites = deployment.publishing().list_for_user(current.user.id).await?;
    Ok(ResponseJson(ApiResponse::success(sites)))
}

/// POST /api/sites
pub async fn publish_site(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    payload: Result<Json<PublishRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<PublishedSite>>, ApiError> {
    let Json(payload) = payload?;
    let site = deployment
        .publishing()
        .publish(current.user.id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(site)))
}

/// GET /api/sites/public
pub async fn list_public_sites(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<PublishedSite>>>, ApiError> {
    let sites = deployment.publishing().list_public().await?;
    Ok(ResponseJson(ApiResponse::success(sites)))
}

/// GET /api/sites/slug?name=My Site
/// The first free slug derived from `name`.
pub async fn suggest_slug(
    State(deployment): State<DeploymentImpl>,
    _current: CurrentUser,
    query: Result<Query<SlugQuery>, QueryRejection>,
) -> Result<ResponseJson<ApiResponse<String>>, ApiError> {
    let Query(query) = query?;
    let slug = deployment.publishing().unique_slug(&query.name).await?;
    Ok(ResponseJson(ApiResponse::success(slug)))
}

/// GET /api/sites/{id}
pub async fn get_site(
    State(deployment): State<DeploymentImpl>,
    viewer: Viewer,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ResponseJson<ApiResponse<PublishedSite>>, ApiError> {
    let Path(id) = id?;
    let site = deployment.publishing().get(viewer.user_id(), id).await?;
    Ok(ResponseJson(ApiResponse::success(site)))
}

/// PUT /api/sites/{id}
pub async fn update_site(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdatePublishedSite>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<PublishedSite>>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let site = deployment
        .publishing()
        .update(current.user.id, id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(site)))
}

/// DELETE /api/sites/{id}
pub async fn unpublish_site(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let Path(id) = id?;
    deployment.publishing().unpublish(current.user.id, id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// Published pages run in an opaque origin so their scripts cannot reach
/// `/api` with the visitor's session.
pub const PUBLISHED_PAGE_CSP: &str = "sandbox allow-scripts allow-forms allow-popups";

/// GET /published/{slug}
/// Serves the stored page and counts the view.
pub async fn serve_published(
    State(deployment): State<DeploymentImpl>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let site = deployment.publishing().visit(&slug).await?;
    Ok((
        [(header::CONTENT_SECURITY_POLICY, PUBLISHED_PAGE_CSP)],
        Html(site.site_content),
    ))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/sites",
        Router::new()
            .route("/", get(list_sites).post(publish_site))
            .route("/public", get(list_public_sites))
            .route("/slug", get(suggest_slug))
            .route(
                "/{id}",
                get(get_site).put(update_site).delete(unpublish_site),
            ),
    )
}

/// Routes served outside `/api`.
pub fn published_router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().route("/published/{slug}", get(serve_published))
}
