use axum::{
    Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    response::Json as ResponseJson,
    routing::post,
};
use deployment::Deployment;
use services::services::generation::{GenerationResult, resolve_prompt};
use tracing::warn;

use crate::DeploymentImpl;

/// POST /api/generate-code
/// Always answers 200. Failures show up as `fallback: true` with a message.
/// An unreadable or oversized body falls back to the default prompt.
pub async fn generate_code(
    State(deployment): State<DeploymentImpl>,
    body: Result<Bytes, BytesRejection>,
) -> ResponseJson<GenerationResult> {
    let prompt = match body {
        Ok(body) => resolve_prompt(&body),
        Err(rejection) => {
            warn!(status = %rejection.status(), "Unreadable generation request body");
            resolve_prompt(&[])
        }
    };
    ResponseJson(deployment.code_generator().generate(&prompt).await)
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().route("/generate-code", post(generate_code))
}
