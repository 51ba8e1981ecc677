//! # Service — the server actions
//!
//! [`Service`] bundles the [`Backend`] handle with the settings and the cached
//! listing routes. Every server function in the `api` crate is a thin wrapper
//! around one method here:
//!
//! | File | Actions |
//! |------|---------|
//! | `notes.rs` | `fetch_notes`, `fetch_note`, `create_note`, `update_note`, `delete_note` |
//! | `posts.rs` | `fetch_posts`, `fetch_post`, `fetch_post_author_profile`, `create_post`, `update_post`, `delete_post` |
//! | `profiles.rs` | `fetch_all_profiles`, `username_exists` |
//! | `auth.rs` | `register`, `login`, `current_user`, `forgot_password`, `reset_password` |
//!
//! Mutations call [`Service::revalidate_path`] for the route whose listing
//! they change.

mod auth;
mod notes;
mod posts;
mod profiles;

use std::sync::Arc;

use sqlx::PgPool;
use store::{Note, PostView};

pub use posts::PostForm;

use crate::cache::RouteCache;
use crate::client::Backend;
use crate::settings::Settings;

pub const NOTES_ROUTE: &str = "/notes";
pub const POSTS_ROUTE: &str = "/posts";

pub struct Service {
    backend: Arc<dyn Backend>,
    settings: Settings,
    pool: Option<PgPool>,
    notes_page: RouteCache<Vec<Note>>,
    posts_page: RouteCache<Vec<PostView>>,
}

impl Service {
    pub fn new(backend: Arc<dyn Backend>, settings: Settings) -> Self {
        Self {
            backend,
            settings,
            pool: None,
            notes_page: RouteCache::new(NOTES_ROUTE),
            posts_page: RouteCache::new(POSTS_ROUTE),
        }
    }

    /// Remember the PostgreSQL pool so the web server can share it.
    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Discard cached output for `path` so the next render reads fresh data.
    pub fn revalidate_path(&self, path: &str) {
        let dropped = match path {
            NOTES_ROUTE => self.notes_page.invalidate(),
            POSTS_ROUTE => self.posts_page.invalidate(),
            _ => false,
        };
        tracing::debug!(%path, dropped, "Revalidated route");
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("settings", &self.settings)
            .field("postgres", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}
