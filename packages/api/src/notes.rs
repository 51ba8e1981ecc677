//! Note server functions. Notes are shared by everyone and need no session.

use dioxus::prelude::*;
use store::Note;

#[cfg(feature = "server")]
use crate::context;

#[cfg(feature = "server")]
#[get("/api/notes")]
pub async fn list_notes() -> Result<Vec<Note>, ServerFnError> {
    let service = context::server_service().await?;
    service.fetch_notes().await.map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/notes")]
pub async fn list_notes() -> Result<Vec<Note>, ServerFnError> {
    Ok(Vec::new())
}

#[cfg(feature = "server")]
#[get("/api/notes/:id")]
pub async fn get_note(id: String) -> Result<Option<Note>, ServerFnError> {
    let service = context::server_service().await?;
    service.fetch_note(&id).await.map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/notes/:id")]
pub async fn get_note(id: String) -> Result<Option<Note>, ServerFnError> {
    Ok(None)
}

#[cfg(feature = "server")]
#[post("/api/notes/create")]
pub async fn create_note(text: String, tag: String) -> Result<Note, ServerFnError> {
    let service = context::server_service().await?;
    service
        .create_note(store::NoteInput { text, tag })
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/notes/create")]
pub async fn create_note(text: String, tag: String) -> Result<Note, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

#[cfg(feature = "server")]
#[post("/api/notes/update")]
pub async fn update_note(id: String, text: String, tag: String) -> Result<Note, ServerFnError> {
    let service = context::server_service().await?;
    service
        .update_note(&id, store::NoteInput { text, tag })
        .await
        .map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/notes/update")]
pub async fn update_note(id: String, text: String, tag: String) -> Result<Note, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

#[cfg(feature = "server")]
#[post("/api/notes/delete")]
pub async fn delete_note(id: String) -> Result<(), ServerFnError> {
    let service = context::server_service().await?;
    service.delete_note(&id).await.map_err(context::server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/notes/delete")]
pub async fn delete_note(id: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
