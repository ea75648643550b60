use async_trait::async_trait;
use db::DBService;
use services::services::{
    auth::AuthService, generation::CodeGenerator, llm_client::LlmError,
    project_transfer::ProjectTransfer, projects::ProjectService, publishing::PublishingService,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub mod config;

pub use config::{ConfigError, DeploymentConfig};

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Everything a running server hands to its routes.
#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new(config: DeploymentConfig) -> Result<Self, DeploymentError>;

    fn config(&self) -> &DeploymentConfig;

    fn db(&self) -> &DBService;

    fn code_generator(&self) -> &CodeGenerator;

    /// Cancelled when the server begins shutting down.
    fn shutdown_token(&self) -> &CancellationToken;

    fn auth(&self) -> AuthService {
        AuthService::new(self.db().pool.clone())
    }

    fn projects(&self) -> ProjectService {
        ProjectService::new(self.db().pool.clone())
    }

    fn publishing(&self) -> PublishingService {
        PublishingService::new(self.db().pool.clone())
    }

    fn project_transfer(&self) -> ProjectTransfer {
        ProjectTransfer::new(self.db().pool.clone())
    }
}
