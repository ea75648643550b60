use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use db::DBService;
use deployment::{Deployment, DeploymentConfig, DeploymentError};
use services::services::{
    generation::CodeGenerator,
    llm_client::{LlmClient, TextGenerator},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Single-process deployment backed by a local SQLite file.
#[derive(Clone)]
pub struct LocalDeployment {
    config: Arc<DeploymentConfig>,
    db: DBService,
    code_generator: CodeGenerator,
    shutdown: CancellationToken,
}

impl LocalDeployment {
    /// Assemble a deployment from ready-made parts without starting background work.
    pub fn from_parts(
        config: DeploymentConfig,
        db: DBService,
        code_generator: CodeGenerator,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config: Arc::new(config),
            db,
            code_generator,
            shutdown,
        }
    }

    fn text_generator(
        config: &DeploymentConfig,
    ) -> Result<Option<Arc<dyn TextGenerator>>, DeploymentError> {
        let Some(api_key) = &config.api_key else {
            warn!("ANTHROPIC_API_KEY not set, generation will serve fallback sites");
            return Ok(None);
        };

        let client = LlmClient::new(api_key.clone(), config.generation_model.clone())?;
        info!(model = client.model(), "AI generation enabled");
        Ok(Some(Arc::new(client)))
    }

    /// Periodically drop expired sessions until shutdown.
    fn spawn_session_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let deployment = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
            loop {
                tokio::select! {
                    _ = deployment.shutdown.cancelled() => break,
                    _ = interval.tick() => {
                        match deployment.auth().purge_expired().await {
                            Ok(0) => {}
                            Ok(removed) => debug!(removed, "Purged expired sessions"),
                            Err(e) => error!(error = %e, "Failed to purge expired sessions"),
                        }
                    }
                }
            }
        })
    }
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new(config: DeploymentConfig) -> Result<Self, DeploymentError> {
        let db = DBService::new(&config.database_url).await?;
        let shutdown = CancellationToken::new();
        let code_generator = CodeGenerator::new(
            Self::text_generator(&config)?,
            config.generation_timeout,
            shutdown.clone(),
        );

        let deployment = Self::from_parts(config, db, code_generator, shutdown);
        deployment.spawn_session_cleanup();
        Ok(deployment)
    }

    fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    fn db(&self) -> &DBService {
        &self.db
    }

    fn code_generator(&self) -> &CodeGenerator {
        &self.code_generator
    }

    fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }
}
