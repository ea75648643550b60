use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use db::models::{session::Session, user::User};
use deployment::Deployment;
use services::services::auth::{AuthError, SESSION_TTL_DAYS};

use crate::{DeploymentImpl, error::ApiError};

pub const SESSION_COOKIE: &str = "session";

/// The signed-in user. Rejects with 401 when the session cookie is missing,
/// unknown or expired.
pub struct CurrentUser {
    pub user: User,
    pub session_id: String,
}

impl FromRequestParts<DeploymentImpl> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        deployment: &DeploymentImpl,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(ApiError::Unauthorized)?;

        let user = deployment.auth().authenticate(&session_id).await?;
        Ok(Self { user, session_id })
    }
}

/// The signed-in user when there is one. Anonymous and stale sessions both
/// read as `None`.
pub struct Viewer(pub Option<User>);

impl Viewer {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|user| user.id)
    }
}

impl FromRequestParts<DeploymentImpl> for Viewer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        deployment: &DeploymentImpl,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, deployment).await {
            Ok(current) => Ok(Viewer(Some(current.user))),
            Err(ApiError::Unauthorized | ApiError::Auth(AuthError::InvalidSession)) => {
                Ok(Viewer(None))
            }
            Err(e) => Err(e),
        }
    }
}

pub fn session_cookie(session: &Session, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}
