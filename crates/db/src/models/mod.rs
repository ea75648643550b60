pub mod file_node;
pub mod project;
pub mod project_like;
pub mod published_site;
pub mod session;
pub mod user;
