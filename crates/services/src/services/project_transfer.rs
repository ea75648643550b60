//! Export of projects as portable JSON documents, and import of the same.

use chrono::{DateTime, Utc};
use db::models::{
    file_node::FileNode,
    project::{CreateProject, Project},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

pub const DEFAULT_IMPORT_NAME: &str = "Imported Project";

#[derive(Debug, Error)]
pub enum ProjectTransferError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("project not found")]
    NotFound,
    #[error("invalid project file: {0}")]
    InvalidDocument(String),
    #[error("project file has no files array")]
    MissingFiles,
}

/// The exported shape of a project. It carries no version field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub id: Uuid,
    pub name: String,
    pub files: Vec<FileNode>,
    pub last_modified: DateTime<Utc>,
}

impl From<&Project> for ProjectDocument {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            files: project.files.clone(),
            last_modified: project.updated_at,
        }
    }
}

impl ProjectDocument {
    pub fn to_pretty_json(&self) -> Result<String, ProjectTransferError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ProjectTransferError::InvalidDocument(e.to_string()))
    }

    /// `<name>.json`, with characters that would break a header value removed.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .filter(|c| !c.is_control() && !matches!(c, '"' | '\\' | '/'))
            .collect();
        let stem = stem.trim();
        format!("{}.json", if stem.is_empty() { "project" } else { stem })
    }
}

/// What an uploaded document contributes to a new project.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedProject {
    pub name: String,
    pub files: Vec<FileNode>,
}

/// Read an uploaded project file. Only `files` is required; every other field
/// of the document is optional and `id`/`lastModified` are never trusted.
pub fn parse_document(body: &[u8]) -> Result<ImportedProject, ProjectTransferError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ProjectTransferError::InvalidDocument(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ProjectTransferError::InvalidDocument("expected a JSON object".into()))?;

    let files = match object.get("files") {
        Some(files @ Value::Array(_)) => Vec::<FileNode>::deserialize(files)
            .map_err(|e| ProjectTransferError::InvalidDocument(e.to_string()))?,
        _ => return Err(ProjectTransferError::MissingFiles),
    };

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_IMPORT_NAME)
        .to_string();

    Ok(ImportedProject { name, files })
}

pub struct ProjectTransfer {
    pool: SqlitePool,
}

impl ProjectTransfer {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Export a project the viewer owns or that is public.
    pub async fn export(
        &self,
        viewer: Option<Uuid>,
        id: Uuid,
    ) -> Result<ProjectDocument, ProjectTransferError> {
        let project = Project::find_by_id(&self.pool, id)
            .await?
            .filter(|project| project.is_public || viewer == Some(project.user_id))
            .ok_or(ProjectTransferError::NotFound)?;
        Ok(ProjectDocument::from(&project))
    }

    /// Store an uploaded document as a new project of `user_id` with a fresh id.
    pub async fn import(&self, user_id: Uuid, body: &[u8]) -> Result<Project, ProjectTransferError> {
        let imported = parse_document(body)?;
        let project = Project::create(
            &self.pool,
            Uuid::new_v4(),
            user_id,
            &CreateProject::named(imported.name, imported.files),
        )
        .await?;
        info!(project_id = %project.id, file_count = project.files.len(), "Imported project");
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use db::{
        DBService,
        models::user::{CreateUser, User},
    };

    use super::*;

    #[test]
    fn document_uses_ui_field_names() {
        let doc = ProjectDocument {
            id: Uuid::nil(),
            name: "Site".to_string(),
            files: vec![FileNode::welcome_page()],
            last_modified: Utc::now(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("lastModified").is_some());
        assert_eq!(json["files"][0]["name"], "index.html");
        assert_eq!(doc.file_name(), "Site.json");
    }

    #[test]
    fn parse_requires_files_array() {
        assert!(matches!(
            parse_document(br#"{"name":"x"}"#),
            Err(ProjectTransferError::MissingFiles)
        ));
        assert!(matches!(
            parse_document(br#"{"files":"nope"}"#),
            Err(ProjectTransferError::MissingFiles)
        ));
        assert!(matches!(
            parse_document(b"[1,2]"),
            Err(ProjectTransferError::InvalidDocument(_))
        ));
        assert!(matches!(
            parse_document(b"{oops"),
            Err(ProjectTransferError::InvalidDocument(_))
        ));
    }

    #[test]
    fn parse_defaults_name() {
        let imported = parse_document(br#"{"files":[]}"#).unwrap();
        assert_eq!(imported.name, DEFAULT_IMPORT_NAME);
        assert!(imported.files.is_empty());
    }

    #[tokio::test]
    async fn export_then_import_preserves_files() {
        let db = DBService::new_in_memory().await.unwrap();
        let user_id = User::create(
            &db.pool,
            Uuid::new_v4(),
            &CreateUser {
                email: "t@example.com".to_string(),
                full_name: None,
            },
            "x",
        )
        .await
        .unwrap()
        .id;
        let files = vec![
            FileNode::welcome_page(),
            FileNode::folder(
                "js",
                "/js",
                vec![FileNode::file("app.js", "/js/app.js", "console.log('hi')")],
            ),
        ];
        let original = Project::create(
            &db.pool,
            Uuid::new_v4(),
            user_id,
            &CreateProject::named("Round Trip", files.clone()),
        )
        .await
        .unwrap();

        let transfer = ProjectTransfer::new(db.pool.clone());
        let document = transfer.export(Some(user_id), original.id).await.unwrap();
        let json = document.to_pretty_json().unwrap();

        let imported = transfer.import(user_id, json.as_bytes()).await.unwrap();
        assert_ne!(imported.id, original.id);
        assert_eq!(imported.name, "Round Trip");
        assert_eq!(imported.files, files);

        assert!(matches!(
            transfer.export(None, original.id).await,
            Err(ProjectTransferError::NotFound)
        ));
    }
}
