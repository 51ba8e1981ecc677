use dioxus::prelude::*;

use super::VIEWS_CSS;

#[component]
pub fn NoteDetailView(id: String, on_back: EventHandler<()>) -> Element {
    let mut id_signal = use_signal(|| id.clone());
    if *id_signal.peek() != id {
        id_signal.set(id.clone());
    }

    let note = use_resource(move || async move { api::get_note(id_signal()).await });

    let body = match &*note.read() {
        None => rsx! { p { class: "muted", "Loading..." } },
        Some(Err(e)) => rsx! { div { class: "alert alert-error", "{e}" } },
        Some(Ok(None)) => rsx! { h1 { class: "empty", "Note not found" } },
        Some(Ok(Some(note))) => {
            let created = note.created_at.format("%Y-%m-%d").to_string();
            rsx! {
                div {
                    class: "card",
                    h1 { "Untitled Note" }
                    p { "{note.text}" }
                    if !note.tag.is_empty() {
                        span { class: "tag", "#{note.tag}" }
                    }
                    p { class: "muted", "Created on: {created}" }
                }
            }
        }
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        main {
            class: "page",
            button { onclick: move |_| on_back.call(()), "Back to Notes" }
            {body}
        }
    }
}
