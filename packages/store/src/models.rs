//! # Domain models for notes, blog posts and profiles
//!
//! Defines the records exchanged between the backend service, the server
//! functions and the UI. Every type is `Serialize + Deserialize` so it can cross
//! the server/client boundary via Dioxus server functions, and ids are plain
//! strings so the same types work in WASM.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Note`] | A row of the `notes` collection: free text plus a single tag. |
//! | [`BlogPost`] | A row of the `blog_posts` collection, owned by its `author`. |
//! | [`PostView`] | A [`BlogPost`] joined with its author's display name, as listed on `/posts`. |
//! | [`Profile`] | A row of the `profiles` collection, one per registered account. |
//! | [`ProfileName`] | The reduced profile projection used to resolve author names. |
//! | [`UserInfo`] | The client-safe view of an authentication account. |
//!
//! Form payloads ([`NoteInput`], [`PostInput`], [`NewProfile`], [`Registration`])
//! carry exactly the fields a page submits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown when a post's author has no profile.
pub const UNKNOWN_AUTHOR: &str = "-";

/// A personal note.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub tag: String,
    pub created_at: DateTime<Utc>,
}

/// Fields submitted when creating or editing a note.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteInput {
    pub text: String,
    pub tag: String,
}

/// A blog post as stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tag: Vec<String>,
    /// Account id of the user who created the post.
    pub author: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl BlogPost {
    /// Attach a resolved author name.
    pub fn with_author_name(self, author_name: impl Into<String>) -> PostView {
        PostView {
            post: self,
            author_name: author_name.into(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        is_post_owned_by(&self.author, user_id)
    }
}

/// A blog post together with its author's display name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: BlogPost,
    pub author_name: String,
}

/// Fields submitted when creating or editing a post. Tags are already split.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub description: String,
    pub tag: Vec<String>,
}

/// A user profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl Profile {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

/// Profile fields needed to build author names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileName {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl ProfileName {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

impl From<&Profile> for ProfileName {
    fn from(profile: &Profile) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
        }
    }
}

/// Profile row to insert for a freshly created account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    pub user_id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Everything the register page submits.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Display name stored as account metadata: "first last".
    pub fn display_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl UserInfo {
    /// Get display name, falling back to email if it is not set.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Whether `user_id` authored a post. Only decides which controls a page
/// shows; the backend checks ownership again on every mutation.
pub fn is_post_owned_by(author: &str, user_id: &str) -> bool {
    author == user_id
}

fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_view_serializes_flat() {
        let now = Utc::now();
        let view = BlogPost {
            id: "p1".into(),
            title: "Hi".into(),
            description: "World".into(),
            tag: vec!["x".into()],
            author: "u1".into(),
            created: now,
            modified: now,
        }
        .with_author_name("Ada Lovelace");

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["title"], "Hi");
        assert_eq!(value["author_name"], "Ada Lovelace");
        assert!(value.get("post").is_none());

        let back: PostView = serde_json::from_value(value).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = UserInfo {
            id: "u1".into(),
            email: "ada@example.com".into(),
            display_name: None,
        };
        assert_eq!(user.display_name(), "ada@example.com");
        user.display_name = Some("Ada Lovelace".into());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_registration_display_name() {
        let form = Registration {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..Default::default()
        };
        assert_eq!(form.display_name(), "Ada Lovelace");
    }
}
