//! # API crate — shared fullstack server functions
//!
//! Defines every Dioxus server function the web frontend calls. Each one is a
//! thin wrapper around a [`backend::Service`] action: it reads the signed-in
//! account from the session, calls the service and converts errors to
//! [`ServerFnError`] carrying the backend's message.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | `server` | Session key and helpers for reading/binding the signed-in account |
//! | [`context`] | `server` | Process-wide [`backend::Service`] handle (lazy `OnceCell` singleton) |
//! | [`routes`] | `server` | Plain axum routes: the JSON login endpoint |
//! | [`notes`] | — | Note server functions |
//! | [`posts`] | — | Blog post server functions |
//! | [`profiles`] | — | Profile lookups |
//!
//! ## Server functions exposed here
//!
//! Every server function is annotated with `#[get(...)]` or `#[post(...)]`
//! and compiled twice: once with full server logic (behind
//! `#[cfg(feature = "server")]`) and once as a thin client stub.
//!
//! - **Authentication**: `get_current_user`, `login_password`, `logout`, `register`,
//!   `forgot_password`, `reset_password`

use dioxus::prelude::*;

pub mod auth;
#[cfg(feature = "server")]
pub mod context;
pub mod notes;
pub mod posts;
pub mod profiles;
#[cfg(feature = "server")]
pub mod routes;

pub use notes::{create_note, delete_note, get_note, list_notes, update_note};
pub use posts::{create_post, delete_post, get_author_profile, get_post, list_posts, update_post};
pub use profiles::{list_profiles, username_exists};
pub use store::{Note, PostView, Profile, ProfileName, UserInfo};

/// Get the current authenticated user from the session.
#[cfg(feature = "server")]
#[get("/api/auth/me", session: tower_sessions::Session)]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    let Some(user_id) = auth::session_user_id(&session).await? else {
        return Ok(None);
    };

    let service = context::server_service().await?;
    service
        .current_user(&user_id)
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/me")]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    Ok(None)
}

/// Log out the current user by clearing the session.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    session
        .flush()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}

/// Register a new account and its profile. Does not sign the user in.
#[cfg(feature = "server")]
#[post("/api/auth/register")]
pub async fn register(
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
) -> Result<UserInfo, ServerFnError> {
    let service = context::server_service().await?;
    service
        .register(store::Registration {
            username,
            first_name,
            last_name,
            email,
            password,
        })
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/register")]
pub async fn register(
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
) -> Result<UserInfo, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log in with email and password.
#[cfg(feature = "server")]
#[post("/api/auth/login-password", session: tower_sessions::Session)]
pub async fn login_password(email: String, password: String) -> Result<UserInfo, ServerFnError> {
    let service = context::server_service().await?;
    let user = service
        .login(&email, &password)
        .await
        .map_err(context::server_error)?;

    auth::sign_in(&session, &user.id)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(user)
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/login-password")]
pub async fn login_password(email: String, password: String) -> Result<UserInfo, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Send password reset instructions to `email`.
#[cfg(feature = "server")]
#[post("/api/auth/forgot-password")]
pub async fn forgot_password(email: String) -> Result<(), ServerFnError> {
    let service = context::server_service().await?;
    service
        .forgot_password(&email)
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/forgot-password")]
pub async fn forgot_password(email: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Set a new password using the code from a reset link.
#[cfg(feature = "server")]
#[post("/api/auth/reset-password")]
pub async fn reset_password(code: String, password: String) -> Result<(), ServerFnError> {
    let service = context::server_service().await?;
    service
        .reset_password(&code, &password)
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/reset-password")]
pub async fn reset_password(code: String, password: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
