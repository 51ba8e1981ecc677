//! Shared page views. The platform package wraps each one in a route and
//! supplies the navigation callbacks.

use dioxus::prelude::*;

mod auth_pages;
mod home;
mod note_detail;
mod notes;
mod post_detail;
mod posts;

pub use auth_pages::{ForgotPasswordView, LoginView, RegisterView, ResetPasswordView};
pub use home::HomeView;
pub use note_detail::NoteDetailView;
pub use notes::NotesView;
pub use post_detail::PostDetailView;
pub use posts::PostsView;

pub(crate) const VIEWS_CSS: Asset = asset!("/src/views/views.css");
