use dioxus::prelude::*;

use super::VIEWS_CSS;
use crate::navbar::BRAND;

const FEATURES: [(&str, &str); 6] = [
    ("Rich Text Editor", "Write beautiful content with our powerful rich text editor."),
    ("Tag Organization", "Organize your posts with tags and categories."),
    ("Collaboration", "Work with team members and manage permissions."),
    ("Secure Platform", "Your content is safe with our enterprise-grade security."),
    ("Code Snippets", "Share code with syntax highlighting and formatting."),
    ("Fast Performance", "Lightning-fast loading times and optimal performance."),
];

/// Landing page.
#[component]
pub fn HomeView() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        nav {
            class: "navbar",
            span { class: "brand", "{BRAND}" }
            div {
                class: "navbar-user",
                a { href: "/login", "Login" }
                a { href: "/register", "Get Started" }
            }
        }
        main {
            class: "page",
            h1 { "Share your ideas with {BRAND}" }
            p { class: "muted", "Write notes, publish posts and tag everything." }
            div {
                class: "grid",
                for (title, description) in FEATURES {
                    div {
                        key: "{title}",
                        class: "card",
                        h2 { "{title}" }
                        p { class: "muted", "{description}" }
                    }
                }
            }
            p {
                class: "empty",
                a { href: "/register", "Get Started Free" }
            }
        }
    }
}
