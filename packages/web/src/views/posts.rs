use dioxus::prelude::*;
use ui::views::{PostDetailView, PostsView};

use crate::Route;

#[component]
pub fn Posts() -> Element {
    let nav = use_navigator();
    rsx! {
        PostsView {
            on_open: move |id: String| {
                nav.push(Route::PostDetail { id });
            },
            on_unauthenticated: move |_| {
                nav.replace(Route::Login {});
            },
        }
    }
}

#[component]
pub fn PostDetail(id: String) -> Element {
    let nav = use_navigator();
    rsx! {
        PostDetailView {
            id: id,
            on_back: move |_| {
                nav.push(Route::Posts {});
            },
        }
    }
}
