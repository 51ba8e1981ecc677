//! # Backend client — the data and authentication service seam
//!
//! [`Backend`] is the handle every server action talks to. It covers the three
//! collections (`notes`, `blog_posts`, `profiles`) and the authentication
//! operations (sign up, sign in, user lookup, password reset, password
//! update). Two implementations exist:
//!
//! | Type | Storage |
//! |------|---------|
//! | [`crate::MemoryBackend`] | Process memory; used for tests and when no database is configured. |
//! | [`crate::PgBackend`] | PostgreSQL through a shared `sqlx` pool. |
//!
//! [`connect`] is the factory: it reads [`Settings`] and returns a ready
//! [`Service`] wrapping whichever backend the settings select.
//!
//! ## Guarantees
//!
//! - Usernames and emails are unique in storage. A duplicate insert reports
//!   [`BackendError::UsernameTaken`] / [`BackendError::EmailTaken`].
//! - [`Backend::update_post`] and [`Backend::delete_post`] compare the acting
//!   account with the post's author inside the same storage operation and
//!   return [`BackendError::Forbidden`] without touching the row otherwise.
//! - Post listings carry author names resolved by storage, ordered newest
//!   first.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use rand::distributions::{Alphanumeric, DistString};
use sqlx::postgres::PgPoolOptions;
use store::messages::MIN_PASSWORD_LEN;
use store::{BlogPost, NewProfile, Note, NoteInput, PostInput, PostView, Profile, ProfileName, UserInfo};

use crate::error::{BackendError, Result};
use crate::mailer::{LogMailer, Mailer};
use crate::memory::MemoryBackend;
use crate::postgres::PgBackend;
use crate::service::Service;
use crate::settings::Settings;

#[async_trait]
pub trait Backend: Send + Sync {
    // notes
    async fn list_notes(&self) -> Result<Vec<Note>>;
    async fn get_note(&self, id: &str) -> Result<Option<Note>>;
    async fn insert_note(&self, input: NoteInput) -> Result<Note>;
    async fn update_note(&self, id: &str, input: NoteInput) -> Result<Note>;
    async fn delete_note(&self, id: &str) -> Result<()>;

    // blog_posts
    async fn list_posts(&self) -> Result<Vec<PostView>>;
    async fn get_post(&self, id: &str) -> Result<Option<PostView>>;
    async fn insert_post(&self, author: &str, input: PostInput) -> Result<BlogPost>;
    async fn update_post(&self, actor: &str, id: &str, input: PostInput) -> Result<BlogPost>;
    async fn delete_post(&self, actor: &str, id: &str) -> Result<()>;

    // profiles
    async fn list_profile_names(&self) -> Result<Vec<ProfileName>>;
    async fn get_profile_by_user(&self, user_id: &str) -> Result<Option<Profile>>;
    async fn username_exists(&self, username: &str) -> Result<bool>;
    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile>;

    // auth
    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<UserInfo>;
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<UserInfo>;
    async fn get_user(&self, id: &str) -> Result<Option<UserInfo>>;
    async fn delete_user(&self, id: &str) -> Result<()>;
    /// Mail a reset link to `email`. Unknown addresses succeed without mail.
    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<()>;
    /// Consume a reset code and return the account it was issued for.
    async fn exchange_reset_code(&self, code: &str) -> Result<UserInfo>;
    async fn update_user_password(&self, id: &str, password: &str) -> Result<()>;
}

/// Build the service selected by `settings`.
pub async fn connect(settings: Settings) -> Result<Service> {
    connect_with_mailer(settings, Arc::new(LogMailer)).await
}

pub async fn connect_with_mailer(settings: Settings, mailer: Arc<dyn Mailer>) -> Result<Service> {
    if !settings.database.is_configured() {
        tracing::info!("No database configured, using in-memory backend");
        let backend = MemoryBackend::with_mailer(mailer).with_reset_ttl(reset_ttl(&settings));
        return Ok(Service::new(Arc::new(backend), settings));
    }

    let pool = PgPoolOptions::new()
        .max_connections(settings.database.connections)
        .connect(&settings.database.url)
        .await?;
    let backend = PgBackend::new(pool.clone(), mailer).with_reset_ttl(reset_ttl(&settings));
    backend.migrate().await?;
    tracing::info!("Connected to PostgreSQL backend");

    Ok(Service::new(Arc::new(backend), settings).with_pool(pool))
}

fn reset_ttl(settings: &Settings) -> Duration {
    Duration::seconds(settings.auth.ttl)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn check_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BackendError::WeakPassword);
    }
    Ok(())
}

pub(crate) fn check_email(email: &str) -> Result<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(BackendError::Validation("Invalid email address".into()));
    }
    Ok(())
}

pub(crate) fn new_reset_code() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), 32)
}
