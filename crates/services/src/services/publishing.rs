//! Publishing a project's `index.html` under a unique public slug.

use db::models::{
    project::Project,
    published_site::{NewPublishedSite, PublishedSite, UpdatePublishedSite},
};
use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use utils::text::slugify;
use uuid::Uuid;

use super::file_tree;

const FALLBACK_SLUG: &str = "site";

#[derive(Debug, Error)]
pub enum PublishingError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("project not found")]
    ProjectNotFound,
    #[error("site not found")]
    SiteNotFound,
    #[error("slug already taken: {0}")]
    SlugTaken(String),
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct PublishRequest {
    #[serde(alias = "projectId")]
    pub project_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, alias = "isPublic")]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "seoTitle")]
    pub seo_title: Option<String>,
    #[serde(default, alias = "seoDescription")]
    pub seo_description: Option<String>,
    #[serde(default, alias = "seoImage")]
    pub seo_image: Option<String>,
}

pub struct PublishingService {
    pool: SqlitePool,
}

impl PublishingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn publish(
        &self,
        user_id: Uuid,
        request: &PublishRequest,
    ) -> Result<PublishedSite, PublishingError> {
        if request.name.trim().is_empty() {
            return Err(PublishingError::MissingField("name"));
        }

        let project = Project::find_by_id(&self.pool, request.project_id)
            .await?
            .filter(|project| project.user_id == user_id)
            .ok_or(PublishingError::ProjectNotFound)?;

        let site_content = file_tree::find_by_name(&project.files, "index.html")
            .map(|file| file.content().to_string())
            .unwrap_or_default();
        let slug = self
            .unique_slug(request.slug.as_deref().unwrap_or(&request.name))
            .await?;

        let data = NewPublishedSite {
            user_id,
            project_id: project.id,
            name: request.name.trim().to_string(),
            description: request.description.clone(),
            slug,
            is_public: request.is_public.unwrap_or(true),
            tags: request.tags.clone(),
            site_content,
            seo_title: request.seo_title.clone(),
            seo_description: request.seo_description.clone(),
            seo_image: request.seo_image.clone(),
        };

        let site = PublishedSite::create(&self.pool, Uuid::new_v4(), &data)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    PublishingError::SlugTaken(data.slug.clone())
                }
                e => PublishingError::Database(e),
            })?;

        info!(site_id = %site.id, slug = %site.slug, project_id = %project.id, "Published site");
        Ok(site)
    }

    /// The slug form of `name`, suffixed with `-1`, `-2`, ... until unused.
    pub async fn unique_slug(&self, name: &str) -> Result<String, PublishingError> {
        let mut base = slugify(name);
        if base.is_empty() {
            base = FALLBACK_SLUG.to_string();
        }

        if !PublishedSite::slug_exists(&self.pool, &base).await? {
            return Ok(base);
        }

        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !PublishedSite::slug_exists(&self.pool, &candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PublishedSite>, PublishingError> {
        Ok(PublishedSite::find_by_user_id(&self.pool, user_id).await?)
    }

    pub async fn list_public(&self) -> Result<Vec<PublishedSite>, PublishingError> {
        Ok(PublishedSite::find_public(&self.pool).await?)
    }

    /// A site the viewer published, or any public site.
    pub async fn get(&self, viewer: Option<Uuid>, id: Uuid) -> Result<PublishedSite, PublishingError> {
        PublishedSite::find_by_id(&self.pool, id)
            .await?
            .filter(|site| site.is_public || viewer == Some(site.user_id))
            .ok_or(PublishingError::SiteNotFound)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        updates: &UpdatePublishedSite,
    ) -> Result<PublishedSite, PublishingError> {
        self.get_owned(user_id, id).await?;
        PublishedSite::update(&self.pool, id, updates)
            .await?
            .ok_or(PublishingError::SiteNotFound)
    }

    pub async fn unpublish(&self, user_id: Uuid, id: Uuid) -> Result<(), PublishingError> {
        let site = self.get_owned(user_id, id).await?;
        PublishedSite::delete(&self.pool, id).await?;
        info!(site_id = %id, slug = %site.slug, "Unpublished site");
        Ok(())
    }

    /// Look up a public site for serving and count the view.
    pub async fn visit(&self, slug: &str) -> Result<PublishedSite, PublishingError> {
        let site = PublishedSite::find_by_slug(&self.pool, slug)
            .await?
            .filter(|site| site.is_public)
            .ok_or(PublishingError::SiteNotFound)?;
        PublishedSite::increment_views(&self.pool, site.id).await?;
        Ok(site)
    }

    async fn get_owned(&self, user_id: Uuid, id: Uuid) -> Result<PublishedSite, PublishingError> {
        PublishedSite::find_by_id(&self.pool, id)
            .await?
            .filter(|site| site.user_id == user_id)
            .ok_or(PublishingError::SiteNotFound)
    }
}
