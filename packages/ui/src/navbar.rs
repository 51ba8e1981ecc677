use dioxus::prelude::*;

use crate::views::VIEWS_CSS;
use crate::{use_auth, LogoutButton};

pub const BRAND: &str = "SaucyBlog";

/// Top bar with the brand, the signed-in user's name and a logout button.
#[component]
pub fn Navbar(on_logout: EventHandler<()>) -> Element {
    let auth = use_auth();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        nav {
            class: "navbar",
            span { class: "brand", "{BRAND}" }
            div {
                class: "navbar-user",
                if let Some(user) = auth().user {
                    span { class: "muted", "{user.display_name()}" }
                    LogoutButton { class: "outline", on_logout: on_logout }
                } else {
                    a { href: "/login", "Login" }
                    a { href: "/register", "Register" }
                }
            }
        }
    }
}
