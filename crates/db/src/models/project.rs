use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type, types::Json};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::file_node::FileNode;

#[derive(Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[sqlx(type_name = "template_difficulty")]
pub enum TemplateDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(json)]
    pub files: Vec<FileNode>,
    pub is_template: bool,
    pub is_public: bool,
    pub template_category: Option<String>,
    #[sqlx(json)]
    pub template_tags: Vec<String>,
    pub template_difficulty: Option<TemplateDifficulty>,
    pub downloads_count: i64,
    pub likes_count: i64,
    pub is_starred: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>, // the project's "last modified" time
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub files: Vec<FileNode>,
    pub is_template: Option<bool>,
    pub is_public: Option<bool>,
    pub template_category: Option<String>,
    pub template_tags: Option<Vec<String>>,
    pub template_difficulty: Option<TemplateDifficulty>,
}

impl CreateProject {
    pub fn named(name: impl Into<String>, files: Vec<FileNode>) -> Self {
        Self {
            name: name.into(),
            files,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub files: Option<Vec<FileNode>>,
    pub is_template: Option<bool>,
    pub is_public: Option<bool>,
    pub template_category: Option<String>,
    pub template_tags: Option<Vec<String>>,
    pub template_difficulty: Option<TemplateDifficulty>,
}

#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct UserProjectStats {
    pub total_projects: i64,
    pub public_projects: i64,
    pub templates: i64,
    pub total_downloads: i64,
    pub total_likes: i64,
}

const PROJECT_COLUMNS: &str = "id, user_id, name, description, files, is_template, is_public, \
     template_category, template_tags, template_difficulty, downloads_count, likes_count, \
     is_starred, created_at, updated_at";

impl Project {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        user_id: Uuid,
        data: &CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Project>(&format!(
            r#"INSERT INTO projects (id, user_id, name, description, files, is_template, is_public,
                                     template_category, template_tags, template_difficulty,
                                     created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(user_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(Json(&data.files))
        .bind(data.is_template.unwrap_or(false))
        .bind(data.is_public.unwrap_or(false))
        .bind(&data.template_category)
        .bind(Json(data.template_tags.clone().unwrap_or_default()))
        .bind(&data.template_difficulty)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Projects owned by `user_id`, most recently modified first.
    pub async fn find_by_user_id(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_public(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE is_public = 1 ORDER BY downloads_count DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_templates(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            r#"SELECT {PROJECT_COLUMNS} FROM projects
               WHERE is_template = 1 AND is_public = 1
               ORDER BY downloads_count DESC"#
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        updates: &UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            r#"UPDATE projects
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   files = COALESCE($4, files),
                   is_template = COALESCE($5, is_template),
                   is_public = COALESCE($6, is_public),
                   template_category = COALESCE($7, template_category),
                   template_tags = COALESCE($8, template_tags),
                   template_difficulty = COALESCE($9, template_difficulty),
                   updated_at = $10
               WHERE id = $1
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(&updates.name)
        .bind(&updates.description)
        .bind(updates.files.as_ref().map(Json))
        .bind(updates.is_template)
        .bind(updates.is_public)
        .bind(&updates.template_category)
        .bind(updates.template_tags.as_ref().map(Json))
        .bind(&updates.template_difficulty)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }

    /// Replace the file tree wholesale and bump `updated_at`, but only while
    /// the stored tree still equals `expected`. `None` when the row is gone or
    /// was changed in the meantime.
    pub async fn update_files(
        pool: &SqlitePool,
        id: Uuid,
        expected: &[FileNode],
        files: &[FileNode],
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            r#"UPDATE projects SET files = $2, updated_at = $3
               WHERE id = $1 AND files = $4
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(Json(files))
        .bind(Utc::now())
        .bind(Json(expected))
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn increment_downloads(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE projects SET downloads_count = downloads_count + 1 WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn adjust_likes<'e, E>(executor: E, id: Uuid, delta: i64) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query("UPDATE projects SET likes_count = MAX(likes_count + $2, 0) WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn toggle_star(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            r#"UPDATE projects SET is_starred = NOT is_starred
               WHERE id = $1
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn stats_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<UserProjectStats, sqlx::Error> {
        sqlx::query_as::<_, UserProjectStats>(
            r#"SELECT
                COUNT(*)                                 AS total_projects,
                COALESCE(SUM(is_public), 0)              AS public_projects,
                COALESCE(SUM(is_template), 0)            AS templates,
                COALESCE(SUM(downloads_count), 0)        AS total_downloads,
                COALESCE(SUM(likes_count), 0)            AS total_likes
               FROM projects
               WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DBService,
        models::user::{CreateUser, User},
    };

    async fn setup() -> (DBService, Uuid) {
        let db = DBService::new_in_memory().await.unwrap();
        let user = User::create(
            &db.pool,
            Uuid::new_v4(),
            &CreateUser {
                email: "owner@example.com".to_string(),
                full_name: None,
            },
            "x",
        )
        .await
        .unwrap();
        (db, user.id)
    }

    #[tokio::test]
    async fn files_round_trip_through_json_column() {
        let (db, user_id) = setup().await;
        let files = vec![
            FileNode::welcome_page(),
            FileNode::folder(
                "css",
                "/css",
                vec![FileNode::file("site.css", "/css/site.css", "body{}")],
            ),
        ];
        let project = Project::create(
            &db.pool,
            Uuid::new_v4(),
            user_id,
            &CreateProject::named("Site", files.clone()),
        )
        .await
        .unwrap();

        let found = Project::find_by_id(&db.pool, project.id).await.unwrap().unwrap();
        assert_eq!(found.files, files);
        assert!(found.template_tags.is_empty());
    }

    #[tokio::test]
    async fn update_files_refuses_stale_tree() {
        let (db, user_id) = setup().await;
        let original = vec![FileNode::welcome_page()];
        let project = Project::create(
            &db.pool,
            Uuid::new_v4(),
            user_id,
            &CreateProject::named("Site", original.clone()),
        )
        .await
        .unwrap();

        let mut first = original.clone();
        first.push(FileNode::file("a.html", "/a.html", ""));
        let updated = Project::update_files(&db.pool, project.id, &original, &first)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.files, first);

        let mut second = original.clone();
        second.push(FileNode::file("b.html", "/b.html", ""));
        assert!(
            Project::update_files(&db.pool, project.id, &original, &second)
                .await
                .unwrap()
                .is_none()
        );

        let stored = Project::find_by_id(&db.pool, project.id).await.unwrap().unwrap();
        assert_eq!(stored.files, first);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (db, user_id) = setup().await;
        let mut data = CreateProject::named("Before", vec![FileNode::welcome_page()]);
        data.description = Some("keep me".to_string());
        let project = Project::create(&db.pool, Uuid::new_v4(), user_id, &data)
            .await
            .unwrap();

        let updated = Project::update(
            &db.pool,
            project.id,
            &UpdateProject {
                name: Some("After".to_string()),
                is_public: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.name, "After");
        assert_eq!(updated.description.as_deref(), Some("keep me"));
        assert!(updated.is_public);
        assert_eq!(updated.files, project.files);
        assert!(updated.updated_at >= project.updated_at);
    }

    #[tokio::test]
    async fn stats_aggregate_per_user() {
        let (db, user_id) = setup().await;
        let mut public = CreateProject::named("Public", vec![]);
        public.is_public = Some(true);
        public.is_template = Some(true);
        let a = Project::create(&db.pool, Uuid::new_v4(), user_id, &public).await.unwrap();
        Project::create(&db.pool, Uuid::new_v4(), user_id, &CreateProject::named("Private", vec![]))
            .await
            .unwrap();
        Project::increment_downloads(&db.pool, a.id).await.unwrap();
        Project::increment_downloads(&db.pool, a.id).await.unwrap();
        Project::adjust_likes(&db.pool, a.id, 1).await.unwrap();

        let stats = Project::stats_for_user(&db.pool, user_id).await.unwrap();
        assert_eq!(
            stats,
            UserProjectStats {
                total_projects: 2,
                public_projects: 1,
                templates: 1,
                total_downloads: 2,
                total_likes: 1,
            }
        );

        let templates = Project::find_templates(&db.pool).await.unwrap();
        assert_eq!(templates.len(), 1);
    }

    #[tokio::test]
    async fn likes_never_go_negative() {
        let (db, user_id) = setup().await;
        let project = Project::create(&db.pool, Uuid::new_v4(), user_id, &CreateProject::named("P", vec![]))
            .await
            .unwrap();
        Project::adjust_likes(&db.pool, project.id, -1).await.unwrap();
        let found = Project::find_by_id(&db.pool, project.id).await.unwrap().unwrap();
        assert_eq!(found.likes_count, 0);
    }
}
