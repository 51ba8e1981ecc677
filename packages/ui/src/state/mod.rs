//! # Page state — view models for the forms and boards
//!
//! Every page keeps one of these in a `Signal` and renders from it. They hold
//! no Dioxus types, so the validation rules and the mapping from backend
//! errors to user-facing messages are tested as plain functions.
//!
//! | Type | Page |
//! |------|------|
//! | [`LoginForm`] | `/login` |
//! | [`RegisterForm`] | `/register` |
//! | [`ForgotPasswordForm`] | `/forgot-password` |
//! | [`ResetPasswordForm`] | `/reset-password?code=…` |
//! | [`NotesBoard`] | `/notes` |
//! | [`PostsBoard`] | `/posts` |

mod auth_forms;
mod boards;

pub use auth_forms::{
    ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm, REDIRECT_DELAY,
};
pub use boards::{NoteDraft, NotesBoard, PostDraft, PostsBoard};

/// Where a form is in its submit cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Success(String),
    Error(String),
}

impl Phase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Phase::Submitting)
    }

    pub fn success(&self) -> Option<&str> {
        match self {
            Phase::Success(message) => Some(message),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Error(message) => Some(message),
            _ => None,
        }
    }
}
