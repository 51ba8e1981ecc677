use dioxus::prelude::*;
use store::PostView;

use super::VIEWS_CSS;
use crate::components::PostCard;
use crate::state::PostsBoard;
use crate::{refresh_auth, use_auth, Navbar};

/// The blog board. Requires a signed-in user; `on_unauthenticated` fires
/// when the session has none.
#[component]
pub fn PostsView(
    on_open: EventHandler<String>,
    on_unauthenticated: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let mut board = use_signal(PostsBoard::default);

    let _loader = use_resource(move || async move {
        refresh_auth(auth).await;
        if auth.peek().user.is_none() {
            on_unauthenticated.call(());
            return;
        }
        match api::list_posts().await {
            Ok(posts) => board.write().posts = posts,
            Err(e) => {
                tracing::error!("Error fetching posts: {e}");
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
                Some(id) => api::update_post(id, draft.title, draft.description, draft.tags).await,
                None => api::create_post(draft.title, draft.description, draft.tags).await,
            };
            match result {
                Ok(view) => board.write().saved(view),
                Err(e) => board.write().edit_failed(&e.to_string()),
            }
        });
    };

    let handle_delete = move |id: String| {
        spawn(async move {
            match api::delete_post(id.clone()).await {
                Ok(()) => board.write().removed(&id),
                Err(e) => board.write().delete_failed(&e.to_string()),
            }
        });
    };

    let auth_state = auth();
    if auth_state.user.is_none() {
        return rsx! { p { class: "empty", "Loading..." } };
    }

    let user_id = auth_state.user_id().map(str::to_string);
    let state = board();
    let visible: Vec<_> = state.visible().into_iter().cloned().collect();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        Navbar { on_logout: on_unauthenticated }
        main {
            class: "page",
            div {
                class: "toolbar",
                input {
                    placeholder: "Search blog posts...",
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
                h2 { if state.editing.is_some() { "Edit Post" } else { "Add New Post" } }
                input {
                    placeholder: "Title",
                    required: true,
                    value: "{state.draft.title}",
                    oninput: move |evt: FormEvent| board.write().draft.title = evt.value(),
                }
                textarea {
                    placeholder: "Description",
                    value: "{state.draft.description}",
                    oninput: move |evt: FormEvent| board.write().draft.description = evt.value(),
                }
                input {
                    placeholder: "Tags (comma-separated)",
                    value: "{state.draft.tags}",
                    oninput: move |evt: FormEvent| board.write().draft.tags = evt.value(),
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
                for view in visible.iter().cloned() {
                    PostCard {
                        key: "{view.post.id}",
                        can_manage: PostsBoard::can_manage(&view, user_id.as_deref()),
                        view: view.clone(),
                        on_open: on_open,
                        on_edit: move |view: PostView| board.write().start_edit(&view),
                        on_delete: handle_delete,
                    }
                }
            }

            if visible.is_empty() {
                p { class: "empty", "{PostsBoard::EMPTY}" }
            }
        }
    }
}
