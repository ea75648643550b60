//! Accounts, Argon2 password hashes and cookie sessions.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use db::models::{
    session::Session,
    user::{CreateUser, UpdateUserProfile, User},
};
use rand::RngCore;
use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

pub const SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("not authenticated")]
    InvalidSession,
    #[error("user not found")]
    UserNotFound,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub struct AuthService {
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<(User, Session), AuthError> {
        let email = normalize_email(&request.email).ok_or(AuthError::MissingField("email"))?;
        if request.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        if User::find_by_email(&self.pool, &email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let data = CreateUser {
            email,
            full_name: request
                .full_name
                .clone()
                .filter(|name| !name.trim().is_empty()),
        };
        let password_hash = hash_password(&request.password)?;
        let user = User::create(&self.pool, Uuid::new_v4(), &data, &password_hash)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => AuthError::EmailTaken,
                e => AuthError::Database(e),
            })?;

        info!(user_id = %user.id, "User signed up");
        let session = self.start_session(user.id).await?;
        Ok((user, session))
    }

    pub async fn sign_in(&self, request: &SignInRequest) -> Result<(User, Session), AuthError> {
        let email = normalize_email(&request.email).ok_or(AuthError::MissingField("email"))?;
        if request.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let credentials = User::find_credentials_by_email(&self.pool, &email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(&request.password, &credentials.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let user = User::find_by_id(&self.pool, credentials.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        info!(user_id = %user.id, "User signed in");
        let session = self.start_session(user.id).await?;
        Ok((user, session))
    }

    pub async fn sign_out(&self, session_id: &str) -> Result<(), AuthError> {
        Session::delete(&self.pool, session_id).await?;
        Ok(())
    }

    /// Resolve a session id to its user. Unknown and expired sessions are
    /// rejected; expired ones are removed.
    pub async fn authenticate(&self, session_id: &str) -> Result<User, AuthError> {
        let session = Session::find_by_id(&self.pool, session_id)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        if session.is_expired(Utc::now()) {
            debug!(user_id = %session.user_id, "Session expired");
            Session::delete(&self.pool, session_id).await?;
            return Err(AuthError::InvalidSession);
        }

        User::find_by_id(&self.pool, session.user_id)
            .await?
            .ok_or(AuthError::InvalidSession)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        updates: &UpdateUserProfile,
    ) -> Result<User, AuthError> {
        User::update_profile(&self.pool, user_id, updates)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Remove every expired session.
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        Ok(Session::delete_expired(&self.pool, Utc::now()).await?)
    }

    async fn start_session(&self, user_id: Uuid) -> Result<Session, AuthError> {
        let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);
        Ok(Session::create(&self.pool, &random_hex(32), user_id, expires_at).await?)
    }
}

fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim();
    (!email.is_empty()).then(|| email.to_lowercase())
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// PHC string (`$argon2id$...`) with a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// False for a wrong password and for a stored value that is not a PHC string.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(hash) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}
