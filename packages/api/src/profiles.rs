//! Profile lookups.

use dioxus::prelude::*;
use store::ProfileName;

#[cfg(feature = "server")]
use crate::context;

/// Names of every profile, keyed by account id.
#[cfg(feature = "server")]
#[get("/api/profiles")]
pub async fn list_profiles() -> Result<Vec<ProfileName>, ServerFnError> {
    let service = context::server_service().await?;
    service
        .fetch_all_profiles()
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/profiles")]
pub async fn list_profiles() -> Result<Vec<ProfileName>, ServerFnError> {
    Ok(Vec::new())
}

#[cfg(feature = "server")]
#[get("/api/profiles/exists/:username")]
pub async fn username_exists(username: String) -> Result<bool, ServerFnError> {
    let service = context::server_service().await?;
    service
        .username_exists(&username)
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/profiles/exists/:username")]
pub async fn username_exists(username: String) -> Result<bool, ServerFnError> {
    Ok(false)
}
