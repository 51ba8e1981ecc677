//! PostgreSQL backend.
//!
//! Ids are `UUID` columns; a malformed id string can never match a row, so it
//! is treated like a missing one. Migrations are embedded from `migrations/`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use store::{
    BlogPost, NewProfile, Note, NoteInput, PostInput, PostView, Profile, ProfileName, UserInfo,
    UNKNOWN_AUTHOR,
};
use uuid::Uuid;

use crate::client::{check_email, check_password, new_reset_code, normalize_email, Backend};
use crate::error::{BackendError, Result};
use crate::mailer::{reset_link, Mailer};
use crate::password::Passwords;

const USERNAME_CONSTRAINT: &str = "profiles_username_key";

const POST_VIEW_COLUMNS: &str = "p.id, p.title, p.description, p.tag, p.author, p.created, p.modified, \
     COALESCE(pr.first_name || ' ' || pr.last_name, $1) AS author_name";

#[derive(Debug, FromRow)]
struct NoteRow {
    id: Uuid,
    text: String,
    tag: String,
    created_at: DateTime<Utc>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: row.id.to_string(),
            text: row.text,
            tag: row.tag,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    description: String,
    tag: Vec<String>,
    author: Uuid,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl From<PostRow> for BlogPost {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id.to_string(),
            title: row.title,
            description: row.description,
            tag: row.tag,
            author: row.author.to_string(),
            created: row.created,
            modified: row.modified,
        }
    }
}

#[derive(Debug, FromRow)]
struct PostViewRow {
    #[sqlx(flatten)]
    post: PostRow,
    author_name: String,
}

impl From<PostViewRow> for PostView {
    fn from(row: PostViewRow) -> Self {
        BlogPost::from(row.post).with_author_name(row.author_name)
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    user_id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id.to_string(),
            user_id: row.user_id.to_string(),
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProfileNameRow {
    user_id: Uuid,
    first_name: String,
    last_name: String,
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    display_name: Option<String>,
    password_hash: String,
}

impl AccountRow {
    fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.to_string(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

#[derive(Debug, FromRow)]
struct ResetRow {
    account_id: Uuid,
    expires_at: DateTime<Utc>,
}

fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

/// Backend over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
    passwords: Passwords,
    mailer: Arc<dyn Mailer>,
    reset_ttl: Duration,
}

impl PgBackend {
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            pool,
            passwords: Passwords::default(),
            mailer,
            reset_ttl: Duration::hours(1),
        }
    }

    pub fn with_reset_ttl(mut self, ttl: Duration) -> Self {
        self.reset_ttl = ttl;
        self
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn account_by_id(&self, id: Uuid) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, display_name, password_hash FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl Backend for PgBackend {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let rows = sqlx::query_as::<_, NoteRow>(
            "SELECT id, text, tag, created_at FROM notes ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn get_note(&self, id: &str) -> Result<Option<Note>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, NoteRow>(
            "SELECT id, text, tag, created_at FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Note::from))
    }

    async fn insert_note(&self, input: NoteInput) -> Result<Note> {
        let row = sqlx::query_as::<_, NoteRow>(
            "INSERT INTO notes (text, tag) VALUES ($1, $2) RETURNING id, text, tag, created_at",
        )
        .bind(&input.text)
        .bind(&input.tag)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_note(&self, id: &str, input: NoteInput) -> Result<Note> {
        let id = parse_id(id).ok_or(BackendError::NotFound)?;
        let row = sqlx::query_as::<_, NoteRow>(
            "UPDATE notes SET text = $2, tag = $3 WHERE id = $1 RETURNING id, text, tag, created_at",
        )
        .bind(id)
        .bind(&input.text)
        .bind(&input.tag)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Note::from).ok_or(BackendError::NotFound)
    }

    async fn delete_note(&self, id: &str) -> Result<()> {
        let id = parse_id(id).ok_or(BackendError::NotFound)?;
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<PostView>> {
        let sql = format!(
            "SELECT {POST_VIEW_COLUMNS} FROM blog_posts p \
             LEFT JOIN profiles pr ON pr.user_id = p.author \
             ORDER BY p.created DESC"
        );
        let rows = sqlx::query_as::<_, PostViewRow>(&sql)
            .bind(UNKNOWN_AUTHOR)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(PostView::from).collect())
    }

    async fn get_post(&self, id: &str) -> Result<Option<PostView>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let sql = format!(
            "SELECT {POST_VIEW_COLUMNS} FROM blog_posts p \
             LEFT JOIN profiles pr ON pr.user_id = p.author \
             WHERE p.id = $2"
        );
        let row = sqlx::query_as::<_, PostViewRow>(&sql)
            .bind(UNKNOWN_AUTHOR)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(PostView::from))
    }

    async fn insert_post(&self, author: &str, input: PostInput) -> Result<BlogPost> {
        let author = parse_id(author).ok_or(BackendError::NotAuthenticated)?;
        let row = sqlx::query_as::<_, PostRow>(
            "INSERT INTO blog_posts (title, description, tag, author) VALUES ($1, $2, $3, $4) \
             RETURNING id, title, description, tag, author, created, modified",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.tag)
        .bind(author)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                BackendError::NotAuthenticated
            }
            _ => BackendError::Database(e),
        })?;
        Ok(row.into())
    }

    async fn update_post(&self, actor: &str, id: &str, input: PostInput) -> Result<BlogPost> {
        let id = parse_id(id).ok_or(BackendError::NotFound)?;
        let actor = parse_id(actor).ok_or(BackendError::Forbidden)?;
        let row = sqlx::query_as::<_, PostRow>(
            "UPDATE blog_posts SET title = $3, description = $4, tag = $5, modified = now() \
             WHERE id = $1 AND author = $2 \
             RETURNING id, title, description, tag, author, created, modified",
        )
        .bind(id)
        .bind(actor)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.tag)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(row.into()),
            None => Err(self.missing_or_forbidden(id).await),
        }
    }

    async fn delete_post(&self, actor: &str, id: &str) -> Result<()> {
        let id = parse_id(id).ok_or(BackendError::NotFound)?;
        let actor = parse_id(actor).ok_or(BackendError::Forbidden)?;
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1 AND author = $2")
            .bind(id)
            .bind(actor)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(self.missing_or_forbidden(id).await);
        }
        Ok(())
    }

    async fn list_profile_names(&self) -> Result<Vec<ProfileName>> {
        let rows = sqlx::query_as::<_, ProfileNameRow>(
            "SELECT user_id, first_name, last_name FROM profiles",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| ProfileName {
                user_id: row.user_id.to_string(),
                first_name: row.first_name,
                last_name: row.last_name,
            })
            .collect())
    }

    async fn get_profile_by_user(&self, user_id: &str) -> Result<Option<Profile>> {
        let Some(user_id) = parse_id(user_id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, user_id, username, first_name, last_name FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::from))
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        let existing: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM profiles WHERE username = $1 LIMIT 1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(existing.is_some())
    }

    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile> {
        let user_id = parse_id(&profile.user_id).ok_or(BackendError::NotFound)?;
        let row = sqlx::query_as::<_, ProfileRow>(
            "INSERT INTO profiles (user_id, username, first_name, last_name) VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, username, first_name, last_name",
        )
        .bind(user_id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.constraint() == Some(USERNAME_CONSTRAINT) => {
                BackendError::UsernameTaken
            }
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                BackendError::Validation("Profile already exists for this account".into())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => BackendError::NotFound,
            _ => BackendError::Database(e),
        })?;
        Ok(row.into())
    }

    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<UserInfo> {
        let email = normalize_email(email);
        check_email(&email)?;
        check_password(password)?;
        let password_hash = self.passwords.hash(password)?;
        let display_name = display_name.trim();

        let row = sqlx::query_as::<_, AccountRow>(
            "INSERT INTO accounts (email, display_name, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, email, display_name, password_hash",
        )
        .bind(&email)
        .bind((!display_name.is_empty()).then_some(display_name))
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if BackendError::is_unique_violation(&e) {
                BackendError::EmailTaken
            } else {
                BackendError::Database(e)
            }
        })?;
        Ok(row.to_info())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<UserInfo> {
        let email = normalize_email(email);
        let account = sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, display_name, password_hash FROM accounts WHERE email = $1",
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(account) = account else {
            return Err(BackendError::InvalidCredentials);
        };
        if !self.passwords.verify(password, &account.password_hash)? {
            return Err(BackendError::InvalidCredentials);
        }
        Ok(account.to_info())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserInfo>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        Ok(self.account_by_id(id).await?.map(|row| row.to_info()))
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        let id = parse_id(id).ok_or(BackendError::NotFound)?;
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<()> {
        let email = normalize_email(email);
        let account: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM accounts WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;
        let Some((account_id,)) = account else {
            tracing::debug!("Password reset for unknown email ignored");
            return Ok(());
        };

        let code = new_reset_code();
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM password_resets WHERE account_id = $1 OR expires_at <= now()")
            .bind(account_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO password_resets (code, account_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&code)
            .bind(account_id)
            .bind(Utc::now() + self.reset_ttl)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.mailer
            .send_password_reset(&email, &reset_link(redirect_to, &code))
    }

    async fn exchange_reset_code(&self, code: &str) -> Result<UserInfo> {
        let reset = sqlx::query_as::<_, ResetRow>(
            "DELETE FROM password_resets WHERE code = $1 RETURNING account_id, expires_at",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BackendError::InvalidResetCode)?;

        if reset.expires_at <= Utc::now() {
            return Err(BackendError::InvalidResetCode);
        }
        self.account_by_id(reset.account_id)
            .await?
            .map(|row| row.to_info())
            .ok_or(BackendError::InvalidResetCode)
    }

    async fn update_user_password(&self, id: &str, password: &str) -> Result<()> {
        check_password(password)?;
        let id = parse_id(id).ok_or(BackendError::NotFound)?;
        let password_hash = self.passwords.hash(password)?;
        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(&password_hash)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }
}

impl PgBackend {
    /// Explain why a guarded post mutation matched no row.
    async fn missing_or_forbidden(&self, id: Uuid) -> BackendError {
        let exists: std::result::Result<Option<(Uuid,)>, sqlx::Error> =
            sqlx::query_as("SELECT id FROM blog_posts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        match exists {
            Ok(Some(_)) => BackendError::Forbidden,
            Ok(None) => BackendError::NotFound,
            Err(e) => BackendError::Database(e),
        }
    }
}
