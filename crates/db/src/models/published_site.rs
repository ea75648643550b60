use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PublishedSite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub custom_domain: Option<String>,
    pub is_public: bool,
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub views_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub site_content: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row values for a new site; the slug and content are resolved by the caller.
#[derive(Debug, Clone)]
pub struct NewPublishedSite {
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub site_content: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdatePublishedSite {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub site_content: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_image: Option<String>,
}

const SITE_COLUMNS: &str = "id, user_id, project_id, name, description, slug, custom_domain, \
     is_public, tags, views_count, likes_count, comments_count, site_content, seo_title, \
     seo_description, seo_image, published_at, updated_at";

impl PublishedSite {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &NewPublishedSite,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, PublishedSite>(&format!(
            r#"INSERT INTO published_sites (id, user_id, project_id, name, description, slug,
                                            is_public, tags, site_content, seo_title,
                                            seo_description, seo_image, published_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
               RETURNING {SITE_COLUMNS}"#
        ))
        .bind(id)
        .bind(data.user_id)
        .bind(data.project_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.slug)
        .bind(data.is_public)
        .bind(Json(&data.tags))
        .bind(&data.site_content)
        .bind(&data.seo_title)
        .bind(&data.seo_description)
        .bind(&data.seo_image)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PublishedSite>(&format!(
            "SELECT {SITE_COLUMNS} FROM published_sites WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PublishedSite>(&format!(
            "SELECT {SITE_COLUMNS} FROM published_sites WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    pub async fn slug_exists(pool: &SqlitePool, slug: &str) -> Result<bool, sqlx::Error> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM published_sites WHERE slug = $1")
                .bind(slug)
                .fetch_one(pool)
                .await?;
        Ok(count > 0)
    }

    /// Sites published by `user_id`, newest first.
    pub async fn find_by_user_id(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PublishedSite>(&format!(
            "SELECT {SITE_COLUMNS} FROM published_sites WHERE user_id = $1 ORDER BY published_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Public sites, most viewed first.
    pub async fn find_public(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PublishedSite>(&format!(
            "SELECT {SITE_COLUMNS} FROM published_sites WHERE is_public = 1 ORDER BY views_count DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        updates: &UpdatePublishedSite,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PublishedSite>(&format!(
            r#"UPDATE published_sites
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   is_public = COALESCE($4, is_public),
                   tags = COALESCE($5, tags),
                   site_content = COALESCE($6, site_content),
                   seo_title = COALESCE($7, seo_title),
                   seo_description = COALESCE($8, seo_description),
                   seo_image = COALESCE($9, seo_image),
                   updated_at = $10
               WHERE id = $1
               RETURNING {SITE_COLUMNS}"#
        ))
        .bind(id)
        .bind(&updates.name)
        .bind(&updates.description)
        .bind(updates.is_public)
        .bind(updates.tags.as_ref().map(Json))
        .bind(&updates.site_content)
        .bind(&updates.seo_title)
        .bind(&updates.seo_description)
        .bind(&updates.seo_image)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM published_sites WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn increment_views(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE published_sites SET views_count = views_count + 1 WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
