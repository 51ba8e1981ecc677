use dioxus::prelude::*;
use store::Note;

use super::VIEWS_CSS;
use crate::components::NoteCard;
use crate::state::NotesBoard;

/// The notes board: search, add, edit and delete.
#[component]
pub fn NotesView(on_open: EventHandler<String>) -> Element {
    let mut board = use_signal(NotesBoard::default);

    let _loader = use_resource(move || async move {
        match api::list_notes().await {
            Ok(notes) => board.write().notes = notes,
            Err(e) => {
                tracing::error!("Failed to load notes: {e}");
                board.write().error = Some(e.to_string());
            }
        }
    });

    let handle_save = move |evt: FormEvent| {
        evt.prevent_default();
        let (editing, draft) = {
            let state = board.read();
            (state.editing.clone(), state.draft.clone())
        };
        spawn(async move {
            let result = match editing {
                Some(id) => api::update_note(id, draft.text, draft.tag).await,
                None => api::create_note(draft.text, draft.tag).await,
            };
            match result {
                Ok(note) => board.write().saved(note),
                Err(e) => board.write().error = Some(e.to_string()),
            }
        });
    };

    let handle_delete = move |id: String| {
        spawn(async move {
            match api::delete_note(id.clone()).await {
                Ok(()) => board.write().removed(&id),
                Err(e) => board.write().error = Some(e.to_string()),
            }
        });
    };

    let state = board();
    let visible: Vec<_> = state.visible().into_iter().cloned().collect();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        header { class: "navbar", h1 { "My Notes" } }
        main {
            class: "page",
            div {
                class: "toolbar",
                input {
                    placeholder: "Search notes...",
                    value: "{state.search}",
                    oninput: move |evt: FormEvent| board.write().search = evt.value(),
                }
            }

            if let Some(error) = &state.error {
                div { class: "alert alert-error", "{error}" }
            }

            form {
                class: "editor",
                onsubmit: handle_save,
                h2 { if state.editing.is_some() { "Edit Note" } else { "Add New Note" } }
                textarea {
                    placeholder: "Note text",
                    required: true,
                    value: "{state.draft.text}",
                    oninput: move |evt: FormEvent| board.write().draft.text = evt.value(),
                }
                input {
                    placeholder: "Tag",
                    value: "{state.draft.tag}",
                    oninput: move |evt: FormEvent| board.write().draft.tag = evt.value(),
                }
                div {
                    class: "card-actions",
                    button {
                        r#type: "submit",
                        if state.editing.is_some() { "Save" } else { "Add" }
                    }
                    if state.editing.is_some() {
                        button {
                            r#type: "button",
                            onclick: move |_| board.write().cancel_edit(),
                            "Cancel"
                        }
                    }
                }
            }

            div {
                class: "grid",
                for note in visible.iter().cloned() {
                    NoteCard {
                        key: "{note.id}",
                        note: note,
                        on_open: on_open,
                        on_edit: move |note: Note| board.write().start_edit(&note),
                        on_delete: handle_delete,
                    }
                }
            }

            if visible.is_empty() {
                p { class: "empty", "{NotesBoard::EMPTY}" }
            }
        }
    }
}
