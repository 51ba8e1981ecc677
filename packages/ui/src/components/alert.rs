use dioxus::prelude::*;

use crate::state::Phase;

/// Success or error banner for a form, nothing while idle or submitting.
#[component]
pub fn FormAlert(phase: Phase) -> Element {
    rsx! {
        if let Some(message) = phase.success() {
            div { class: "alert alert-success", role: "status", "{message}" }
        }
        if let Some(message) = phase.error() {
            div { class: "alert alert-error", role: "alert", "{message}" }
        }
    }
}
