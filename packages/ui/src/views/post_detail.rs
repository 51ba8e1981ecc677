use dioxus::prelude::*;

use super::VIEWS_CSS;
use crate::components::TagList;

/// A single post with its author's profile.
#[component]
pub fn PostDetailView(id: String, on_back: EventHandler<()>) -> Element {
    let mut id_signal = use_signal(|| id.clone());
    if *id_signal.peek() != id {
        id_signal.set(id.clone());
    }

    let post = use_resource(move || async move {
        let Some(view) = api::get_post(id_signal()).await? else {
            return Ok(None);
        };
        let profile = api::get_author_profile(view.post.author.clone()).await?;
        Ok::<_, ServerFnError>(Some((view, profile)))
    });

    let body = match &*post.read() {
        None => rsx! { p { class: "muted", "Loading..." } },
        Some(Err(e)) => rsx! { div { class: "alert alert-error", "{e}" } },
        Some(Ok(None)) => rsx! { h1 { class: "empty", "Blog post not found" } },
        Some(Ok(Some((view, profile)))) => {
            let author = profile
                .as_ref()
                .map(|profile| profile.full_name())
                .unwrap_or_else(|| view.author_name.clone());
            let created = view.post.created.format("%Y-%m-%d %H:%M").to_string();
            let modified = view.post.modified.format("%Y-%m-%d %H:%M").to_string();
            rsx! {
                div {
                    class: "card",
                    h1 { "{view.post.title}" }
                    p { "{view.post.description}" }
                    if !view.post.tag.is_empty() {
                        TagList { tags: view.post.tag.clone() }
                    }
                    div {
                        class: "muted",
                        div { "Author: {author}" }
                        div { "Created on: {created}" }
                        div { "Last modified: {modified}" }
                    }
                }
            }
        }
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        main {
            class: "page",
            button { onclick: move |_| on_back.call(()), "Back to Blog Posts" }
            {body}
        }
    }
}
