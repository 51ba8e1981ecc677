//! Session handling shared by the server functions and the JSON login route.

#[cfg(feature = "server")]
mod session;

#[cfg(feature = "server")]
pub use session::{require_user, session_user_id, sign_in, SESSION_USER_ID_KEY};
