use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default)]
#[sqlx(type_name = "subscription_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

/// Public view of an account. The password hash never leaves the db crate.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub subscription_tier: SubscriptionTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateUser {
    pub email: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateUserProfile {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

const USER_COLUMNS: &str =
    "id, email, full_name, avatar_url, subscription_tier, created_at, updated_at";

impl User {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateUser,
        password_hash: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (id, email, full_name, subscription_tier, password_hash, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $6)
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(id)
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(SubscriptionTier::Free)
        .bind(password_hash)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_credentials_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        sqlx::query_as::<_, UserCredentials>(
            "SELECT id, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Apply the present fields of `updates`, keeping the stored value for absent ones.
    pub async fn update_profile(
        pool: &SqlitePool,
        id: Uuid,
        updates: &UpdateUserProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET full_name = COALESCE($2, full_name),
                   avatar_url = COALESCE($3, avatar_url),
                   updated_at = $4
               WHERE id = $1
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(id)
        .bind(&updates.full_name)
        .bind(&updates.avatar_url)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    #[tokio::test]
    async fn create_and_find_user() {
        let db = DBService::new_in_memory().await.unwrap();
        let data = CreateUser {
            email: "ada@example.com".to_string(),
            full_name: Some("Ada".to_string()),
        };
        let user = User::create(&db.pool, Uuid::new_v4(), &data, "salt$hash")
            .await
            .unwrap();
        assert_eq!(user.subscription_tier, SubscriptionTier::Free);

        let found = User::find_by_email(&db.pool, "ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);

        let credentials = User::find_credentials_by_email(&db.pool, "ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credentials.password_hash, "salt$hash");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let db = DBService::new_in_memory().await.unwrap();
        let data = CreateUser {
            email: "dup@example.com".to_string(),
            full_name: None,
        };
        User::create(&db.pool, Uuid::new_v4(), &data, "x").await.unwrap();
        let err = User::create(&db.pool, Uuid::new_v4(), &data, "y").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn update_profile_keeps_absent_fields() {
        let db = DBService::new_in_memory().await.unwrap();
        let data = CreateUser {
            email: "grace@example.com".to_string(),
            full_name: Some("Grace".to_string()),
        };
        let user = User::create(&db.pool, Uuid::new_v4(), &data, "x").await.unwrap();

        let updated = User::update_profile(
            &db.pool,
            user.id,
            &UpdateUserProfile {
                full_name: None,
                avatar_url: Some("https://example.com/a.png".to_string()),
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.full_name.as_deref(), Some("Grace"));
        assert_eq!(updated.avatar_url.as_deref(), Some("https://example.com/a.png"));
    }
}
