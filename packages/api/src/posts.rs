//! Blog post server functions. Listing and reading are public; creating,
//! editing and deleting act as the signed-in account, and the backend refuses
//! edits and deletes by anyone but the author.

use dioxus::prelude::*;
use store::{PostView, Profile};

#[cfg(feature = "server")]
use crate::{auth, context};

#[cfg(feature = "server")]
#[get("/api/posts")]
pub async fn list_posts() -> Result<Vec<PostView>, ServerFnError> {
    let service = context::server_service().await?;
    service.fetch_posts().await.map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/posts")]
pub async fn list_posts() -> Result<Vec<PostView>, ServerFnError> {
    Ok(Vec::new())
}

#[cfg(feature = "server")]
#[get("/api/posts/:id")]
pub async fn get_post(id: String) -> Result<Option<PostView>, ServerFnError> {
    let service = context::server_service().await?;
    service.fetch_post(&id).await.map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/posts/:id")]
pub async fn get_post(id: String) -> Result<Option<PostView>, ServerFnError> {
    Ok(None)
}

/// Profile of a post's author, for the detail page.
#[cfg(feature = "server")]
#[get("/api/posts/author/:user_id")]
pub async fn get_author_profile(user_id: String) -> Result<Option<Profile>, ServerFnError> {
    let service = context::server_service().await?;
    service
        .fetch_post_author_profile(&user_id)
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/posts/author/:user_id")]
pub async fn get_author_profile(user_id: String) -> Result<Option<Profile>, ServerFnError> {
    Ok(None)
}

/// Create a post. `tags` is the raw comma-separated input.
#[cfg(feature = "server")]
#[post("/api/posts/create", session: tower_sessions::Session)]
pub async fn create_post(
    title: String,
    description: String,
    tags: String,
) -> Result<PostView, ServerFnError> {
    let user_id = auth::require_user(&session).await?;
    let service = context::server_service().await?;
    service
        .create_post(
            &user_id,
            backend::PostForm {
                title,
                description,
                tags,
            },
        )
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/posts/create")]
pub async fn create_post(
    title: String,
    description: String,
    tags: String,
) -> Result<PostView, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

#[cfg(feature = "server")]
#[post("/api/posts/update", session: tower_sessions::Session)]
pub async fn update_post(
    id: String,
    title: String,
    description: String,
    tags: String,
) -> Result<PostView, ServerFnError> {
    let user_id = auth::require_user(&session).await?;
    let service = context::server_service().await?;
    service
        .update_post(
            &user_id,
            &id,
            backend::PostForm {
                title,
                description,
                tags,
            },
        )
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/posts/update")]
pub async fn update_post(
    id: String,
    title: String,
    description: String,
    tags: String,
) -> Result<PostView, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

#[cfg(feature = "server")]
#[post("/api/posts/delete", session: tower_sessions::Session)]
pub async fn delete_post(id: String) -> Result<(), ServerFnError> {
    let user_id = auth::require_user(&session).await?;
    let service = context::server_service().await?;
    service
        .delete_post(&user_id, &id)
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/posts/delete")]
pub async fn delete_post(id: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
