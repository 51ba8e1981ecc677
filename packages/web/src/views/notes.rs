use dioxus::prelude::*;
use ui::views::{NoteDetailView, NotesView};

use crate::Route;

#[component]
pub fn Notes() -> Element {
    let nav = use_navigator();
    rsx! {
        NotesView {
            on_open: move |id: String| {
                nav.push(Route::NoteDetail { id });
            },
        }
    }
}

#[component]
pub fn NoteDetail(id: String) -> Element {
    let nav = use_navigator();
    rsx! {
        NoteDetailView {
            id: id,
            on_back: move |_| {
                nav.push(Route::Notes {});
            },
        }
    }
}
