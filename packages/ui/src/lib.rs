//! This crate contains all shared UI for the workspace.
//!
//! Page views live in [`views`] and render from the view models in
//! [`state`]; the platform package routes to them.

pub mod components;
pub mod state;
pub mod views;

mod auth;
pub use auth::{refresh_auth, use_auth, AuthProvider, AuthState, LogoutButton};

mod navbar;
pub use navbar::Navbar;

mod timer;
pub use timer::sleep;
