//! Stored projects: ownership rules, likes, stars and file-tree edits.

use db::models::{
    file_node::{FileKind, FileNode},
    project::{CreateProject, Project, UpdateProject, UserProjectStats},
    project_like::ProjectLike,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use super::file_tree::{self, FileTreeError};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("project not found")]
    NotFound,
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error(transparent)]
    FileTree(#[from] FileTreeError),
    #[error("project files are being edited concurrently, try again")]
    EditConflict,
}

const MAX_EDIT_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct LikeStatus {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateFileRequest {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: FileKind,
    #[serde(default, alias = "parentPath")]
    pub parent_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct UpdateFileRequest {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct RenameFileRequest {
    #[serde(alias = "oldPath")]
    pub old_path: String,
    #[serde(alias = "newName")]
    pub new_name: String,
}

pub struct ProjectService {
    pool: SqlitePool,
}

impl ProjectService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, ProjectError> {
        Ok(Project::find_by_user_id(&self.pool, user_id).await?)
    }

    pub async fn list_public(&self) -> Result<Vec<Project>, ProjectError> {
        Ok(Project::find_public(&self.pool).await?)
    }

    pub async fn list_templates(&self) -> Result<Vec<Project>, ProjectError> {
        Ok(Project::find_templates(&self.pool).await?)
    }

    /// New projects without files start from the welcome page.
    pub async fn create(
        &self,
        user_id: Uuid,
        mut data: CreateProject,
    ) -> Result<Project, ProjectError> {
        if data.files.is_empty() {
            data.files = vec![FileNode::welcome_page()];
        }
        let project = Project::create(&self.pool, Uuid::new_v4(), user_id, &data).await?;
        info!(project_id = %project.id, user_id = %user_id, "Created project");
        Ok(project)
    }

    /// A project the viewer owns, or any public project.
    pub async fn get(&self, viewer: Option<Uuid>, id: Uuid) -> Result<Project, ProjectError> {
        let project = Project::find_by_id(&self.pool, id)
            .await?
            .ok_or(ProjectError::NotFound)?;
        if project.is_public || viewer == Some(project.user_id) {
            Ok(project)
        } else {
            Err(ProjectError::NotFound)
        }
    }

    /// A project owned by `user_id`. Other users' projects read as missing.
    pub async fn get_owned(&self, user_id: Uuid, id: Uuid) -> Result<Project, ProjectError> {
        Project::find_by_id(&self.pool, id)
            .await?
            .filter(|project| project.user_id == user_id)
            .ok_or(ProjectError::NotFound)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        updates: &UpdateProject,
    ) -> Result<Project, ProjectError> {
        self.get_owned(user_id, id).await?;
        Project::update(&self.pool, id, updates)
            .await?
            .ok_or(ProjectError::NotFound)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ProjectError> {
        self.get_owned(user_id, id).await?;
        Project::delete(&self.pool, id).await?;
        info!(project_id = %id, "Deleted project");
        Ok(())
    }

    pub async fn record_download(
        &self,
        viewer: Option<Uuid>,
        id: Uuid,
    ) -> Result<Project, ProjectError> {
        self.get(viewer, id).await?;
        Project::increment_downloads(&self.pool, id).await?;
        self.get(viewer, id).await
    }

    /// Like or unlike a visible project, returning the new state.
    pub async fn toggle_like(&self, user_id: Uuid, id: Uuid) -> Result<LikeStatus, ProjectError> {
        self.get(Some(user_id), id).await?;

        let mut tx = self.pool.begin().await?;
        let liked = if ProjectLike::delete(&mut *tx, user_id, id).await? > 0 {
            Project::adjust_likes(&mut *tx, id, -1).await?;
            false
        } else {
            if ProjectLike::create(&mut *tx, user_id, id).await? > 0 {
                Project::adjust_likes(&mut *tx, id, 1).await?;
            }
            true
        };
        tx.commit().await?;

        let project = self.get(Some(user_id), id).await?;
        debug!(project_id = %id, liked, "Toggled like");
        Ok(LikeStatus {
            liked,
            likes_count: project.likes_count,
        })
    }

    pub async fn liked_project_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, ProjectError> {
        Ok(ProjectLike::project_ids_for_user(&self.pool, user_id).await?)
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<UserProjectStats, ProjectError> {
        Ok(Project::stats_for_user(&self.pool, user_id).await?)
    }

    pub async fn toggle_star(&self, user_id: Uuid, id: Uuid) -> Result<Project, ProjectError> {
        self.get_owned(user_id, id).await?;
        Project::toggle_star(&self.pool, id)
            .await?
            .ok_or(ProjectError::NotFound)
    }

    pub async fn read_file(
        &self,
        viewer: Option<Uuid>,
        id: Uuid,
        path: &str,
    ) -> Result<FileNode, ProjectError> {
        let project = self.get(viewer, id).await?;
        file_tree::select(&project.files, path)
            .cloned()
            .ok_or_else(|| ProjectError::FileNotFound(path.to_string()))
    }

    pub async fn write_file(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: &UpdateFileRequest,
    ) -> Result<Project, ProjectError> {
        self.edit_files(user_id, id, |files| {
            Ok(file_tree::update(files, &request.path, &request.content))
        })
        .await
    }

    pub async fn create_file(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: &CreateFileRequest,
    ) -> Result<Project, ProjectError> {
        self.edit_files(user_id, id, |files| {
            file_tree::create(
                files,
                &request.name,
                request.kind,
                request.parent_path.as_deref(),
            )
        })
        .await
    }

    pub async fn delete_file(
        &self,
        user_id: Uuid,
        id: Uuid,
        path: &str,
    ) -> Result<Project, ProjectError> {
        self.edit_files(user_id, id, |files| Ok(file_tree::delete(files, path)))
            .await
    }

    pub async fn rename_file(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: &RenameFileRequest,
    ) -> Result<Project, ProjectError> {
        self.edit_files(user_id, id, |files| {
            file_tree::rename(files, &request.old_path, &request.new_name)
        })
        .await
    }

    /// Apply a tree transform to an owned project. The row, and with it
    /// `updated_at`, is only written when the tree actually changed. A write
    /// that lost a race with another edit is retried on the fresh tree.
    async fn edit_files<F>(&self, user_id: Uuid, id: Uuid, edit: F) -> Result<Project, ProjectError>
    where
        F: Fn(&[FileNode]) -> Result<Vec<FileNode>, FileTreeError>,
    {
        for _ in 0..MAX_EDIT_ATTEMPTS {
            let project = self.get_owned(user_id, id).await?;
            let files = edit(&project.files)?;
            if files == project.files {
                return Ok(project);
            }

            if let Some(updated) =
                Project::update_files(&self.pool, id, &project.files, &files).await?
            {
                return Ok(updated);
            }
            debug!(project_id = %id, "Files changed during edit, retrying");
        }
        Err(ProjectError::EditConflict)
    }
}
