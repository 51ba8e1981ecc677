//! Login, registration and password recovery routes.

use dioxus::prelude::*;
use ui::views::{ForgotPasswordView, LoginView, RegisterView, ResetPasswordView};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let nav = use_navigator();
    rsx! {
        LoginView {
            on_success: move |_| {
                nav.push(Route::Posts {});
            },
        }
    }
}

#[component]
pub fn Register() -> Element {
    rsx! { RegisterView {} }
}

#[component]
pub fn ForgotPassword() -> Element {
    rsx! { ForgotPasswordView {} }
}

/// `code` comes from the reset link's query string; empty when absent.
#[component]
pub fn ResetPassword(code: String) -> Element {
    let nav = use_navigator();
    let code = (!code.is_empty()).then_some(code);
    rsx! {
        ResetPasswordView {
            code: code,
            on_done: move |_| {
                nav.push(Route::Login {});
            },
        }
    }
}
