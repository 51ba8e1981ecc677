use dioxus::prelude::*;
use store::{Note, PostView};

/// Tags rendered as `#tag` chips.
#[component]
pub fn TagList(tags: Vec<String>) -> Element {
    rsx! {
        div {
            class: "tags",
            for (index, tag) in tags.iter().enumerate() {
                span { key: "{index}", class: "tag", "#{tag}" }
            }
        }
    }
}

/// One note in the `/notes` grid.
#[component]
pub fn NoteCard(
    note: Note,
    on_open: EventHandler<String>,
    on_edit: EventHandler<Note>,
    on_delete: EventHandler<String>,
) -> Element {
    let created = note.created_at.format("%Y-%m-%d").to_string();
    let id = note.id.clone();
    let open_id = note.id.clone();
    let edit_note = note.clone();

    rsx! {
        div {
            class: "card",
            div {
                class: "card-header",
                span { class: "muted", "{created}" }
                div {
                    class: "card-actions",
                    button { onclick: move |_| on_edit.call(edit_note.clone()), "Edit" }
                    button {
                        class: "danger",
                        onclick: move |_| on_delete.call(id.clone()),
                        "Delete"
                    }
                }
            }
            p { "{note.text}" }
            if !note.tag.is_empty() {
                span { class: "muted", "Tag: {note.tag}" }
            }
            button {
                class: "link",
                onclick: move |_| on_open.call(open_id.clone()),
                "View"
            }
        }
    }
}

/// One post in the `/posts` grid. Edit and delete only show for the author.
#[component]
pub fn PostCard(
    view: PostView,
    can_manage: bool,
    on_open: EventHandler<String>,
    on_edit: EventHandler<PostView>,
    on_delete: EventHandler<String>,
) -> Element {
    let created = view.post.created.format("%Y-%m-%d").to_string();
    let id = view.post.id.clone();
    let open_id = view.post.id.clone();
    let edit_view = view.clone();
    let tags = view.post.tag.join(", ");

    rsx! {
        div {
            class: "card",
            div {
                class: "card-header",
                span { class: "muted", "{created} · {view.author_name}" }
                if can_manage {
                    div {
                        class: "card-actions",
                        button { onclick: move |_| on_edit.call(edit_view.clone()), "Edit" }
                        button {
                            class: "danger",
                            onclick: move |_| on_delete.call(id.clone()),
                            "Delete"
                        }
                    }
                }
            }
            h2 { "{view.post.title}" }
            p { "{view.post.description}" }
            span { class: "muted", "Tags: {tags}" }
            button {
                class: "link",
                onclick: move |_| on_open.call(open_id.clone()),
                "View"
            }
        }
    }
}
