use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    auth::AuthError,
    file_tree::FileTreeError,
    project_transfer::ProjectTransferError,
    projects::ProjectError,
    publishing::PublishingError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Publishing(#[from] PublishingError),
    #[error(transparent)]
    ProjectTransfer(#[from] ProjectTransferError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Not authenticated")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) => match e {
                AuthError::Database(_) | AuthError::PasswordHash(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidCredentials | AuthError::InvalidSession => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
            },
            ApiError::Project(e) => match e {
                ProjectError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ProjectError::NotFound | ProjectError::FileNotFound(_) => StatusCode::NOT_FOUND,
                ProjectError::EditConflict => StatusCode::CONFLICT,
                ProjectError::FileTree(e) => match e {
                    FileTreeError::InvalidName(_) | FileTreeError::ParentNotFolder(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    FileTreeError::ParentNotFound(_) => StatusCode::NOT_FOUND,
                    FileTreeError::PathExists(_) => StatusCode::CONFLICT,
                },
            },
            ApiError::Publishing(e) => match e {
                PublishingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
                PublishingError::ProjectNotFound | PublishingError::SiteNotFound => {
                    StatusCode::NOT_FOUND
                }
                PublishingError::SlugTaken(_) => StatusCode::CONFLICT,
                PublishingError::MissingField(_) => StatusCode::BAD_REQUEST,
            },
            ApiError::ProjectTransfer(e) => match e {
                ProjectTransferError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ProjectTransferError::NotFound => StatusCode::NOT_FOUND,
                ProjectTransferError::InvalidDocument(_) | ProjectTransferError::MissingFiles => {
                    StatusCode::BAD_REQUEST
                }
            },
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiResponse::<()>::error(&message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_failure_classes_to_statuses() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(AuthError::EmailTaken).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(ProjectError::FileTree(FileTreeError::InvalidName("..".into())))
                .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ProjectError::EditConflict).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(ProjectTransferError::MissingFiles).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
