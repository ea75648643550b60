pub mod error;
pub mod routes;
pub mod session;

pub type DeploymentImpl = local_deployment::LocalDeployment;
