//! Route components: each wraps a shared view from `ui` and wires its
//! navigation callbacks to the router.

mod auth;
pub use auth::{ForgotPassword, Login, Register, ResetPassword};

mod home;
pub use home::Home;

mod notes;
pub use notes::{NoteDetail, Notes};

mod posts;
pub use posts::{PostDetail, Posts};
