//! # Backend — storage, authentication and server actions
//!
//! Everything that runs only on the server lives here, so it can be exercised
//! with a plain `cargo test` and no Dioxus runtime.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | The [`Backend`] trait and the [`connect`] factory |
//! | [`memory`] | [`MemoryBackend`], in-process tables |
//! | [`postgres`] | [`PgBackend`], sqlx/PostgreSQL with embedded migrations |
//! | [`password`] | argon2 hashing |
//! | [`mailer`] | Reset-link delivery |
//! | [`cache`] | Per-route listing cache |
//! | [`service`] | [`Service`], the server actions called by the `api` crate |
//! | [`settings`] | [`Settings`], loaded with the `config` crate |

pub mod cache;
pub mod client;
pub mod error;
pub mod mailer;
pub mod memory;
pub mod password;
pub mod postgres;
pub mod service;
pub mod settings;

pub use cache::RouteCache;
pub use client::{connect, connect_with_mailer, Backend};
pub use error::{BackendError, Result};
pub use mailer::{LogMailer, Mailer, MemoryMailer, SentMail};
pub use memory::MemoryBackend;
pub use password::Passwords;
pub use postgres::PgBackend;
pub use service::{PostForm, Service, NOTES_ROUTE, POSTS_ROUTE};
pub use settings::Settings;
