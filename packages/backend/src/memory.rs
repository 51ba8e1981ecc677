use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use store::{
    BlogPost, NewProfile, Note, NoteInput, PostInput, PostView, Profile, ProfileName, UserInfo,
    UNKNOWN_AUTHOR,
};
use uuid::Uuid;

use crate::client::{check_email, check_password, new_reset_code, normalize_email, Backend};
use crate::error::{BackendError, Result};
use crate::mailer::{reset_link, LogMailer, Mailer};
use crate::password::Passwords;

#[derive(Clone, Debug)]
struct Account {
    id: String,
    email: String,
    display_name: Option<String>,
    password_hash: String,
}

impl Account {
    fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

#[derive(Clone, Debug)]
struct ResetCode {
    account_id: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    notes: Vec<Note>,
    posts: Vec<BlogPost>,
    /// Keyed by `user_id`.
    profiles: HashMap<String, Profile>,
    /// Unique index: username -> user_id.
    usernames: HashMap<String, String>,
    accounts: HashMap<String, Account>,
    /// Unique index: normalized email -> account id.
    emails: HashMap<String, String>,
    resets: HashMap<String, ResetCode>,
}

impl Tables {
    fn view(&self, post: &BlogPost) -> PostView {
        let name = self
            .profiles
            .get(&post.author)
            .map(Profile::full_name)
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        post.clone().with_author_name(name)
    }
}

/// In-memory backend for testing and database-less runs.
#[derive(Clone)]
pub struct MemoryBackend {
    tables: Arc<Mutex<Tables>>,
    passwords: Passwords,
    mailer: Arc<dyn Mailer>,
    reset_ttl: Duration,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::with_mailer(Arc::new(LogMailer))
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mailer(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            tables: Arc::default(),
            passwords: Passwords::default(),
            mailer,
            reset_ttl: Duration::hours(1),
        }
    }

    pub fn with_passwords(mut self, passwords: Passwords) -> Self {
        self.passwords = passwords;
        self
    }

    pub fn with_reset_ttl(mut self, ttl: Duration) -> Self {
        self.reset_ttl = ttl;
        self
    }

    // Never held across an await point.
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        Ok(self.tables().notes.clone())
    }

    async fn get_note(&self, id: &str) -> Result<Option<Note>> {
        Ok(self.tables().notes.iter().find(|n| n.id == id).cloned())
    }

    async fn insert_note(&self, input: NoteInput) -> Result<Note> {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            text: input.text,
            tag: input.tag,
            created_at: Utc::now(),
        };
        self.tables().notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: &str, input: NoteInput) -> Result<Note> {
        let mut tables = self.tables();
        let note = tables
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(BackendError::NotFound)?;
        note.text = input.text;
        note.tag = input.tag;
        Ok(note.clone())
    }

    async fn delete_note(&self, id: &str) -> Result<()> {
        let mut tables = self.tables();
        let before = tables.notes.len();
        tables.notes.retain(|n| n.id != id);
        if tables.notes.len() == before {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<PostView>> {
        let tables = self.tables();
        let mut posts: Vec<PostView> = tables.posts.iter().map(|p| tables.view(p)).collect();
        posts.sort_by(|a, b| b.post.created.cmp(&a.post.created));
        Ok(posts)
    }

    async fn get_post(&self, id: &str) -> Result<Option<PostView>> {
        let tables = self.tables();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.view(p)))
    }

    async fn insert_post(&self, author: &str, input: PostInput) -> Result<BlogPost> {
        let mut tables = self.tables();
        if !tables.accounts.contains_key(author) {
            return Err(BackendError::NotAuthenticated);
        }
        let now = Utc::now();
        let post = BlogPost {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            tag: input.tag,
            author: author.to_string(),
            created: now,
            modified: now,
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, actor: &str, id: &str, input: PostInput) -> Result<BlogPost> {
        let mut tables = self.tables();
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(BackendError::NotFound)?;
        if !post.is_owned_by(actor) {
            return Err(BackendError::Forbidden);
        }
        post.title = input.title;
        post.description = input.description;
        post.tag = input.tag;
        post.modified = Utc::now();
        Ok(post.clone())
    }

    async fn delete_post(&self, actor: &str, id: &str) -> Result<()> {
        let mut tables = self.tables();
        let post = tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .ok_or(BackendError::NotFound)?;
        if !post.is_owned_by(actor) {
            return Err(BackendError::Forbidden);
        }
        tables.posts.retain(|p| p.id != id);
        Ok(())
    }

    async fn list_profile_names(&self) -> Result<Vec<ProfileName>> {
        Ok(self.tables().profiles.values().map(ProfileName::from).collect())
    }

    async fn get_profile_by_user(&self, user_id: &str) -> Result<Option<Profile>> {
        Ok(self.tables().profiles.get(user_id).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        Ok(self.tables().usernames.contains_key(username))
    }

    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile> {
        let mut tables = self.tables();
        if !tables.accounts.contains_key(&profile.user_id) {
            return Err(BackendError::NotFound);
        }
        if tables.usernames.contains_key(&profile.username) {
            return Err(BackendError::UsernameTaken);
        }
        if tables.profiles.contains_key(&profile.user_id) {
            return Err(BackendError::Validation(
                "Profile already exists for this account".into(),
            ));
        }
        let row = Profile {
            id: Uuid::new_v4().to_string(),
            user_id: profile.user_id,
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
        };
        tables
            .usernames
            .insert(row.username.clone(), row.user_id.clone());
        tables.profiles.insert(row.user_id.clone(), row.clone());
        Ok(row)
    }

    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<UserInfo> {
        let email = normalize_email(email);
        check_email(&email)?;
        check_password(password)?;
        let password_hash = self.passwords.hash(password)?;

        let mut tables = self.tables();
        if tables.emails.contains_key(&email) {
            return Err(BackendError::EmailTaken);
        }
        let display_name = display_name.trim();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            display_name: (!display_name.is_empty()).then(|| display_name.to_string()),
            password_hash,
        };
        tables.emails.insert(email, account.id.clone());
        tables.accounts.insert(account.id.clone(), account.clone());
        Ok(account.to_info())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<UserInfo> {
        let email = normalize_email(email);
        let account = {
            let tables = self.tables();
            tables
                .emails
                .get(&email)
                .and_then(|id| tables.accounts.get(id))
                .cloned()
        };
        let Some(account) = account else {
            return Err(BackendError::InvalidCredentials);
        };
        if !self.passwords.verify(password, &account.password_hash)? {
            return Err(BackendError::InvalidCredentials);
        }
        Ok(account.to_info())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserInfo>> {
        Ok(self.tables().accounts.get(id).map(Account::to_info))
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        let mut tables = self.tables();
        let account = tables.accounts.remove(id).ok_or(BackendError::NotFound)?;
        tables.emails.remove(&account.email);
        if let Some(profile) = tables.profiles.remove(id) {
            tables.usernames.remove(&profile.username);
        }
        tables.posts.retain(|p| p.author != id);
        tables.resets.retain(|_, reset| reset.account_id != id);
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<()> {
        let email = normalize_email(email);
        let code = new_reset_code();
        {
            let mut tables = self.tables();
            let Some(account_id) = tables.emails.get(&email).cloned() else {
                tracing::debug!("Password reset for unknown email ignored");
                return Ok(());
            };
            let now = Utc::now();
            tables
                .resets
                .retain(|_, reset| reset.account_id != account_id && reset.expires_at > now);
            tables.resets.insert(
                code.clone(),
                ResetCode {
                    account_id,
                    expires_at: now + self.reset_ttl,
                },
            );
        }
        self.mailer
            .send_password_reset(&email, &reset_link(redirect_to, &code))
    }

    async fn exchange_reset_code(&self, code: &str) -> Result<UserInfo> {
        let mut tables = self.tables();
        let reset = tables
            .resets
            .remove(code)
            .ok_or(BackendError::InvalidResetCode)?;
        if reset.expires_at <= Utc::now() {
            return Err(BackendError::InvalidResetCode);
        }
        tables
            .accounts
            .get(&reset.account_id)
            .map(Account::to_info)
            .ok_or(BackendError::InvalidResetCode)
    }

    async fn update_user_password(&self, id: &str, password: &str) -> Result<()> {
        check_password(password)?;
        let password_hash = self.passwords.hash(password)?;
        let mut tables = self.tables();
        let account = tables.accounts.get_mut(id).ok_or(BackendError::NotFound)?;
        account.password_hash = password_hash;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MemoryMailer;

    fn backend() -> MemoryBackend {
        MemoryBackend::new().with_passwords(Passwords::fast())
    }

    fn input(title: &str) -> PostInput {
        PostInput {
            title: title.into(),
            description: "body".into(),
            tag: vec!["x".into(), "y".into()],
        }
    }

    #[tokio::test]
    async fn test_note_crud() {
        let backend = backend();

        assert!(backend.list_notes().await.unwrap().is_empty());

        let first = backend
            .insert_note(NoteInput {
                text: "abc".into(),
                tag: "t".into(),
            })
            .await
            .unwrap();
        let second = backend
            .insert_note(NoteInput {
                text: "def".into(),
                tag: String::new(),
            })
            .await
            .unwrap();

        let notes = backend.list_notes().await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].text, "abc");

        let updated = backend
            .update_note(
                &first.id,
                NoteInput {
                    text: "abc!".into(),
                    tag: "t2".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "abc!");
        assert_eq!(updated.created_at, first.created_at);

        backend.delete_note(&first.id).await.unwrap();
        let notes = backend.list_notes().await.unwrap();
        assert_eq!(notes, vec![second]);

        assert!(backend.get_note(&first.id).await.unwrap().is_none());
        assert!(matches!(
            backend.delete_note(&first.id).await,
            Err(BackendError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_sign_up_and_sign_in() {
        let backend = backend();

        let user = backend
            .sign_up(" Ada@Example.com ", "secret1", "Ada Lovelace")
            .await
            .unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.display_name(), "Ada Lovelace");

        let signed_in = backend
            .sign_in_with_password("ada@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(signed_in, user);

        assert!(matches!(
            backend.sign_in_with_password("ada@example.com", "wrong!!").await,
            Err(BackendError::InvalidCredentials)
        ));
        assert!(matches!(
            backend.sign_in_with_password("nobody@example.com", "secret1").await,
            Err(BackendError::InvalidCredentials)
        ));
        assert!(matches!(
            backend.sign_up("ADA@example.com", "secret2", "").await,
            Err(BackendError::EmailTaken)
        ));
        assert!(matches!(
            backend.sign_up("bob@example.com", "short", "").await,
            Err(BackendError::WeakPassword)
        ));
    }

    #[tokio::test]
    async fn test_post_ownership_is_enforced() {
        let backend = backend();
        let owner = backend.sign_up("a@x.io", "secret1", "A").await.unwrap();
        let other = backend.sign_up("b@x.io", "secret1", "B").await.unwrap();

        let post = backend.insert_post(&owner.id, input("Hi")).await.unwrap();

        assert!(matches!(
            backend.update_post(&other.id, &post.id, input("Hacked")).await,
            Err(BackendError::Forbidden)
        ));
        assert!(matches!(
            backend.delete_post(&other.id, &post.id).await,
            Err(BackendError::Forbidden)
        ));
        let stored = backend.get_post(&post.id).await.unwrap().unwrap();
        assert_eq!(stored.post, post);

        let updated = backend
            .update_post(&owner.id, &post.id, input("Hello"))
            .await
            .unwrap();
        assert_eq!(updated.title, "Hello");
        assert!(updated.modified >= post.modified);

        backend.delete_post(&owner.id, &post.id).await.unwrap();
        assert!(backend.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_posts_are_newest_first_with_author_names() {
        let backend = backend();
        let ada = backend.sign_up("a@x.io", "secret1", "").await.unwrap();
        let bob = backend.sign_up("b@x.io", "secret1", "").await.unwrap();
        backend
            .insert_profile(NewProfile {
                user_id: ada.id.clone(),
                username: "ada".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
            })
            .await
            .unwrap();

        backend.insert_post(&ada.id, input("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        backend.insert_post(&bob.id, input("second")).await.unwrap();

        let posts = backend.list_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].post.title, "second");
        assert_eq!(posts[0].author_name, UNKNOWN_AUTHOR);
        assert_eq!(posts[1].author_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let backend = backend();
        let a = backend.sign_up("a@x.io", "secret1", "").await.unwrap();
        let b = backend.sign_up("b@x.io", "secret1", "").await.unwrap();
        let profile = |user_id: &str| NewProfile {
            user_id: user_id.into(),
            username: "alice".into(),
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
        };

        backend.insert_profile(profile(&a.id)).await.unwrap();
        assert!(backend.username_exists("alice").await.unwrap());
        assert!(matches!(
            backend.insert_profile(profile(&b.id)).await,
            Err(BackendError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn test_delete_user_releases_email_and_username() {
        let backend = backend();
        let a = backend.sign_up("a@x.io", "secret1", "").await.unwrap();
        backend
            .insert_profile(NewProfile {
                user_id: a.id.clone(),
                username: "alice".into(),
                first_name: "Alice".into(),
                last_name: "L".into(),
            })
            .await
            .unwrap();

        backend.delete_user(&a.id).await.unwrap();

        assert!(backend.get_user(&a.id).await.unwrap().is_none());
        assert!(!backend.username_exists("alice").await.unwrap());
        assert!(backend.sign_up("a@x.io", "secret1", "").await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_code_is_single_use() {
        let mailer = MemoryMailer::new();
        let backend = MemoryBackend::with_mailer(Arc::new(mailer.clone()))
            .with_passwords(Passwords::fast());
        let user = backend.sign_up("a@x.io", "secret1", "").await.unwrap();

        backend
            .reset_password_for_email("nobody@x.io", "http://h/reset-password")
            .await
            .unwrap();
        assert!(mailer.sent().is_empty());

        backend
            .reset_password_for_email("A@x.io", "http://h/reset-password")
            .await
            .unwrap();
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.io");
        let code = sent[0].link.split("code=").nth(1).unwrap().to_string();

        let account = backend.exchange_reset_code(&code).await.unwrap();
        assert_eq!(account.id, user.id);
        assert!(matches!(
            backend.exchange_reset_code(&code).await,
            Err(BackendError::InvalidResetCode)
        ));

        backend.update_user_password(&user.id, "newsecret").await.unwrap();
        assert!(backend
            .sign_in_with_password("a@x.io", "newsecret")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_new_reset_code_replaces_earlier_ones() {
        let mailer = MemoryMailer::new();
        let backend = MemoryBackend::with_mailer(Arc::new(mailer.clone()))
            .with_passwords(Passwords::fast());
        let user = backend.sign_up("a@x.io", "secret1", "").await.unwrap();

        for _ in 0..2 {
            backend
                .reset_password_for_email("a@x.io", "http://h/reset-password")
                .await
                .unwrap();
        }
        let sent = mailer.sent();
        let first = sent[0].link.split("code=").nth(1).unwrap().to_string();
        let second = sent[1].link.split("code=").nth(1).unwrap().to_string();
        assert_eq!(backend.tables().resets.len(), 1);

        assert!(matches!(
            backend.exchange_reset_code(&first).await,
            Err(BackendError::InvalidResetCode)
        ));
        assert_eq!(backend.exchange_reset_code(&second).await.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_expired_reset_codes_are_pruned() {
        let backend = MemoryBackend::new()
            .with_passwords(Passwords::fast())
            .with_reset_ttl(Duration::seconds(-1));
        backend.sign_up("a@x.io", "secret1", "").await.unwrap();
        backend
            .reset_password_for_email("a@x.io", "http://h/reset-password")
            .await
            .unwrap();

        let backend = backend.with_reset_ttl(Duration::hours(1));
        backend.sign_up("b@x.io", "secret1", "").await.unwrap();
        backend
            .reset_password_for_email("b@x.io", "http://h/reset-password")
            .await
            .unwrap();

        let tables = backend.tables();
        assert_eq!(tables.resets.len(), 1);
        assert!(tables.resets.values().all(|reset| reset.expires_at > Utc::now()));
    }

    #[tokio::test]
    async fn test_expired_reset_code_is_rejected() {
        let mailer = MemoryMailer::new();
        let backend = MemoryBackend::with_mailer(Arc::new(mailer.clone()))
            .with_passwords(Passwords::fast())
            .with_reset_ttl(Duration::seconds(-1));
        backend.sign_up("a@x.io", "secret1", "").await.unwrap();
        backend
            .reset_password_for_email("a@x.io", "http://h/reset-password")
            .await
            .unwrap();
        let code = mailer.sent()[0].link.split("code=").nth(1).unwrap().to_string();

        assert!(matches!(
            backend.exchange_reset_code(&code).await,
            Err(BackendError::InvalidResetCode)
        ));
    }
}
