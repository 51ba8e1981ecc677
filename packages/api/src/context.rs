//! # Service handle — the process-wide backend connection
//!
//! Every server function reaches the backend through [`service`]. The first
//! call loads [`Settings`], connects the backend the settings select and
//! caches the result in a [`tokio::sync::OnceCell`] for all later callers.
//! The web binary calls it once at start-up so configuration or database
//! errors stop the process before it accepts requests.

use backend::{BackendError, Service, Settings};
use dioxus::prelude::ServerFnError;
use tokio::sync::OnceCell;

static SERVICE: OnceCell<Service> = OnceCell::const_new();

/// Get or initialize the shared service.
pub async fn service() -> Result<&'static Service, BackendError> {
    SERVICE
        .get_or_try_init(|| async { backend::connect(Settings::load()?).await })
        .await
}

/// [`service`] with the error converted for a server function.
pub(crate) async fn server_service() -> Result<&'static Service, ServerFnError> {
    service().await.map_err(|e| ServerFnError::new(e.to_string()))
}

/// Convert a backend error for a server function.
pub(crate) fn server_error(e: BackendError) -> ServerFnError {
    ServerFnError::new(e.to_string())
}
