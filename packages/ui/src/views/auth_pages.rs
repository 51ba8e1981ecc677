//! Login, registration and password recovery pages.

use dioxus::prelude::*;

use super::VIEWS_CSS;
use crate::components::FormAlert;
use crate::state::{ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm, REDIRECT_DELAY};
use crate::{sleep, use_auth, AuthState};

/// Email and password login. Calls `on_success` once the session is bound.
#[component]
pub fn LoginView(on_success: EventHandler<()>) -> Element {
    let mut auth = use_auth();
    let mut form = use_signal(LoginForm::default);

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let (email, password) = form.write().begin();
        spawn(async move {
            match api::login_password(email, password).await {
                Ok(user) => {
                    form.write().finish(Ok(()));
                    auth.set(AuthState {
                        user: Some(user),
                        loading: false,
                    });
                    on_success.call(());
                }
                Err(e) => form.write().finish(Err(e.to_string())),
            }
        });
    };

    let state = form();
    let busy = state.phase.is_submitting();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "auth-card",
            h2 { "Login" }
            FormAlert { phase: state.phase.clone() }
            form {
                onsubmit: handle_login,
                input {
                    r#type: "email",
                    placeholder: "Email",
                    required: true,
                    disabled: busy,
                    value: "{state.email}",
                    oninput: move |evt: FormEvent| form.write().email = evt.value(),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    required: true,
                    disabled: busy,
                    value: "{state.password}",
                    oninput: move |evt: FormEvent| form.write().password = evt.value(),
                }
                button {
                    r#type: "submit",
                    disabled: busy,
                    if busy { "Logging in..." } else { "Login" }
                }
            }
            div {
                class: "auth-links",
                p {
                    "Don't have an account? "
                    a { href: "/register", "Register here" }
                }
                p { a { href: "/", "Homepage" } }
                p { a { href: "/forgot-password", "Forgot your password?" } }
            }
        }
    }
}

/// Account registration. Stays on the page and shows a success banner.
#[component]
pub fn RegisterView() -> Element {
    let mut form = use_signal(RegisterForm::default);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(registration) = form.write().begin() else {
            return;
        };
        spawn(async move {
            let result = api::register(
                registration.username,
                registration.first_name,
                registration.last_name,
                registration.email,
                registration.password,
            )
            .await;
            form.write().finish(result.map(|_| ()).map_err(|e| e.to_string()));
        });
    };

    let state = form();
    let busy = state.phase.is_submitting();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "auth-card",
            h2 { "Register" }
            FormAlert { phase: state.phase.clone() }
            if state.suggests_login() {
                p { class: "auth-links", a { href: "/login", "Go to Login" } }
            }
            form {
                onsubmit: handle_register,
                input {
                    r#type: "text",
                    placeholder: "Username",
                    required: true,
                    minlength: 3,
                    disabled: busy,
                    value: "{state.username}",
                    oninput: move |evt: FormEvent| form.write().username = evt.value(),
                }
                input {
                    r#type: "text",
                    placeholder: "First Name",
                    required: true,
                    disabled: busy,
                    value: "{state.first_name}",
                    oninput: move |evt: FormEvent| form.write().first_name = evt.value(),
                }
                input {
                    r#type: "text",
                    placeholder: "Last Name",
                    required: true,
                    disabled: busy,
                    value: "{state.last_name}",
                    oninput: move |evt: FormEvent| form.write().last_name = evt.value(),
                }
                input {
                    r#type: "email",
                    placeholder: "Email",
                    required: true,
                    disabled: busy,
                    value: "{state.email}",
                    oninput: move |evt: FormEvent| form.write().email = evt.value(),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    required: true,
                    disabled: busy,
                    value: "{state.password}",
                    oninput: move |evt: FormEvent| form.write().password = evt.value(),
                }
                button {
                    r#type: "submit",
                    disabled: busy,
                    if busy { "Registering..." } else { "Register" }
                }
            }
            div {
                class: "auth-links",
                p {
                    "Already have an account? "
                    a { href: "/login", "Login here" }
                }
            }
        }
    }
}

#[component]
pub fn ForgotPasswordView() -> Element {
    let mut form = use_signal(ForgotPasswordForm::default);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let email = form.write().begin();
        spawn(async move {
            let result = api::forgot_password(email).await;
            form.write().finish(result.map_err(|e| e.to_string()));
        });
    };

    let state = form();
    let busy = state.phase.is_submitting();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "auth-card",
            h2 { "Forgot Password" }
            p {
                class: "muted",
                "Enter your email address and we'll send you instructions to reset your password."
            }
            FormAlert { phase: state.phase.clone() }
            form {
                onsubmit: handle_submit,
                input {
                    r#type: "email",
                    placeholder: "Email",
                    required: true,
                    disabled: busy,
                    value: "{state.email}",
                    oninput: move |evt: FormEvent| form.write().email = evt.value(),
                }
                button {
                    r#type: "submit",
                    disabled: busy,
                    if busy { "Sending..." } else { "Send Reset Instructions" }
                }
            }
            div {
                class: "auth-links",
                p { a { href: "/login", "Back to Login" } }
            }
        }
    }
}

/// New-password form for a reset link. `on_done` fires a few seconds after
/// a successful reset.
#[component]
pub fn ResetPasswordView(code: Option<String>, on_done: EventHandler<()>) -> Element {
    let mut form = use_signal(move || ResetPasswordForm::new(code.clone()));

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some((code, password)) = form.write().begin() else {
            return;
        };
        spawn(async move {
            let result = api::reset_password(code, password).await;
            let succeeded = result.is_ok();
            form.write().finish(result.map_err(|e| e.to_string()));
            if succeeded {
                sleep(REDIRECT_DELAY).await;
                on_done.call(());
            }
        });
    };

    let state = form();
    let busy = state.phase.is_submitting();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "auth-card",
            h2 { "Reset Password" }
            p { class: "muted", "Please enter your new password below." }
            FormAlert { phase: state.phase.clone() }
            form {
                onsubmit: handle_submit,
                input {
                    r#type: "password",
                    placeholder: "New Password",
                    required: true,
                    disabled: busy,
                    value: "{state.password}",
                    oninput: move |evt: FormEvent| form.write().password = evt.value(),
                }
                input {
                    r#type: "password",
                    placeholder: "Confirm New Password",
                    required: true,
                    disabled: busy,
                    value: "{state.confirm_password}",
                    oninput: move |evt: FormEvent| form.write().confirm_password = evt.value(),
                }
                button {
                    r#type: "submit",
                    disabled: busy,
                    if busy { "Resetting..." } else { "Reset Password" }
                }
            }
            div {
                class: "auth-links",
                p { a { href: "/login", "Back to Login" } }
            }
        }
    }
}
