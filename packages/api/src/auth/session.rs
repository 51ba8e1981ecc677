//! Session access for server functions.

use dioxus::prelude::ServerFnError;
use store::messages::NOT_AUTHENTICATED;
use tower_sessions::Session;

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// The signed-in account id, if any.
pub async fn session_user_id(session: &Session) -> Result<Option<String>, ServerFnError> {
    session
        .get(SESSION_USER_ID_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

/// The signed-in account id, or a "Not authenticated" error.
pub async fn require_user(session: &Session) -> Result<String, ServerFnError> {
    session_user_id(session)
        .await?
        .ok_or_else(|| ServerFnError::new(NOT_AUTHENTICATED))
}

/// Bind the session to `user_id`. The id is cycled first so a session
/// cookie issued before login cannot be reused.
pub async fn sign_in(session: &Session, user_id: &str) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, user_id).await
}
