use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    response::Json as ResponseJson,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use db::models::user::{UpdateUserProfile, User};
use deployment::Deployment;
use services::services::auth::{SignInRequest, SignUpRequest};
use utils::response::ApiResponse;

use crate::{
    DeploymentImpl,
    error::ApiError,
    session::{CurrentUser, SESSION_COOKIE, removal_cookie, session_cookie},
};

/// POST /api/auth/signup
pub async fn sign_up(
    State(deployment): State<DeploymentImpl>,
    jar: CookieJar,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<User>>), ApiError> {
    let Json(payload) = payload?;
    let (user, session) = deployment.auth().sign_up(&payload).await?;

    let jar = jar.add(session_cookie(&session, deployment.config().cookie_secure));
    Ok((jar, ResponseJson(ApiResponse::success(user))))
}

/// POST /api/auth/signin
pub async fn sign_in(
    State(deployment): State<DeploymentImpl>,
    jar: CookieJar,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<User>>), ApiError> {
    let Json(payload) = payload?;
    let (user, session) = deployment.auth().sign_in(&payload).await?;

    let jar = jar.add(session_cookie(&session, deployment.config().cookie_secure));
    Ok((jar, ResponseJson(ApiResponse::success(user))))
}

/// POST /api/auth/signout
/// Succeeds whether or not a session was present.
pub async fn sign_out(
    State(deployment): State<DeploymentImpl>,
    jar: CookieJar,
) -> Result<(CookieJar, ResponseJson<ApiResponse<()>>), ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        deployment.auth().sign_out(cookie.value()).await?;
    }
    Ok((jar.remove(removal_cookie()), ResponseJson(ApiResponse::success(()))))
}

/// GET /api/auth/me
pub async fn me(current: CurrentUser) -> ResponseJson<ApiResponse<User>> {
    ResponseJson(ApiResponse::success(current.user))
}

/// PUT /api/auth/me
pub async fn update_me(
    State(deployment): State<DeploymentImpl>,
    current: CurrentUser,
    payload: Result<Json<UpdateUserProfile>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let Json(payload) = payload?;
    let user = deployment
        .auth()
        .update_profile(current.user.id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/auth",
        Router::new()
            .route("/signup", post(sign_up))
            .route("/signin", post(sign_in))
            .route("/signout", post(sign_out))
            .route("/me", get(me).put(update_me)),
    )
}
