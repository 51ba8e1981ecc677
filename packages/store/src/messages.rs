//! Canonical messages reported by the backend service.
//!
//! Server functions forward backend errors as text, so the pages recognise
//! specific failures by these strings.

pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";
pub const EMAIL_NOT_CONFIRMED: &str = "Email not confirmed";
pub const EMAIL_TAKEN: &str = "User already registered";
pub const USERNAME_TAKEN: &str = "Username already registered";
pub const WEAK_PASSWORD: &str = "Password should be at least 6 characters";
pub const INVALID_RESET_CODE: &str = "Invalid or expired reset code";
pub const PROFILE_NOT_CREATED: &str = "Profile could not be created";
pub const FORBIDDEN: &str = "Not the owner of this record";
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Shortest password the backend accepts.
pub const MIN_PASSWORD_LEN: usize = 6;
