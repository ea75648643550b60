pub mod auth;
pub mod fallback_site;
pub mod file_tree;
pub mod generation;
pub mod llm_client;
pub mod project_transfer;
pub mod projects;
pub mod publishing;
pub mod templates;
