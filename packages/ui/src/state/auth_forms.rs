use std::time::Duration;

use store::messages::{
    EMAIL_NOT_CONFIRMED, EMAIL_TAKEN, INVALID_CREDENTIALS, INVALID_RESET_CODE, MIN_PASSWORD_LEN,
    PROFILE_NOT_CREATED, USERNAME_TAKEN, WEAK_PASSWORD,
};
use store::Registration;

use super::Phase;

/// How long the reset page shows its success message before going to `/login`.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(3);

const MIN_USERNAME_LEN: usize = 3;

const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long.";
const REGISTERED: &str = "Registration successful! You can proceed to login now.";
const RESET_SENT: &str =
    "Password reset instructions have been sent to your email. Please check your inbox.";
const RESET_DONE: &str =
    "Password has been successfully reset. You can now login with your new password.";
const MISSING_CODE: &str = "Invalid or missing reset code. Please request a new password reset.";

fn login_message(error: &str) -> String {
    if error.contains(INVALID_CREDENTIALS) {
        "Invalid email or password. Please try again.".into()
    } else if error.contains(EMAIL_NOT_CONFIRMED) {
        "Please verify your email address before logging in.".into()
    } else {
        error.to_string()
    }
}

fn register_message(error: &str) -> String {
    if error.contains(USERNAME_TAKEN) {
        "This username is already registered.".into()
    } else if error.contains(EMAIL_TAKEN) {
        "This email is already registered.".into()
    } else if error.contains(WEAK_PASSWORD) {
        PASSWORD_TOO_SHORT.into()
    } else if error.contains(PROFILE_NOT_CREATED) {
        "Error creating user profile. Please try again.".into()
    } else {
        error.to_string()
    }
}

fn reset_message(error: &str) -> String {
    if error.contains(INVALID_RESET_CODE) {
        INVALID_RESET_CODE.into()
    } else if error.contains(WEAK_PASSWORD) {
        PASSWORD_TOO_SHORT.into()
    } else {
        error.to_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub phase: Phase,
}

impl LoginForm {
    /// Enter the submitting phase and hand out the credentials.
    pub fn begin(&mut self) -> (String, String) {
        self.phase = Phase::Submitting;
        (self.email.trim().to_string(), self.password.clone())
    }

    /// Record the outcome. On success the page navigates away.
    pub fn finish(&mut self, result: Result<(), String>) {
        self.phase = match result {
            Ok(()) => Phase::Idle,
            Err(error) => Phase::Error(login_message(&error)),
        };
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phase: Phase,
}

impl RegisterForm {
    /// Validate locally and enter the submitting phase. Returns `None` and sets
    /// an error when a field is invalid.
    pub fn begin(&mut self) -> Option<Registration> {
        let username = self.username.trim();
        let error = if username.chars().count() < MIN_USERNAME_LEN {
            Some(format!(
                "Username must be at least {MIN_USERNAME_LEN} characters long."
            ))
        } else if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            Some("Please enter your first and last name.".to_string())
        } else if self.email.trim().is_empty() {
            Some("Please enter your email address.".to_string())
        } else {
            None
        };
        if let Some(error) = error {
            self.phase = Phase::Error(error);
            return None;
        }

        self.phase = Phase::Submitting;
        Some(Registration {
            username: username.to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Record the outcome; success clears every field.
    pub fn finish(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                *self = Self {
                    phase: Phase::Success(REGISTERED.into()),
                    ..Self::default()
                }
            }
            Err(error) => self.phase = Phase::Error(register_message(&error)),
        }
    }

    /// Whether to offer a link to the login page next to the error.
    pub fn suggests_login(&self) -> bool {
        self.phase
            .error()
            .is_some_and(|error| error.contains("already registered"))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForgotPasswordForm {
    pub email: String,
    pub phase: Phase,
}

impl ForgotPasswordForm {
    pub fn begin(&mut self) -> String {
        self.phase = Phase::Submitting;
        self.email.trim().to_string()
    }

    pub fn finish(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.email.clear();
                self.phase = Phase::Success(RESET_SENT.into());
            }
            Err(error) => self.phase = Phase::Error(error),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResetPasswordForm {
    pub code: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub phase: Phase,
}

impl ResetPasswordForm {
    /// Form for the code taken from the query string. A missing code is
    /// reported straight away.
    pub fn new(code: Option<String>) -> Self {
        let code = code.filter(|code| !code.trim().is_empty());
        let phase = match code {
            Some(_) => Phase::Idle,
            None => Phase::Error(MISSING_CODE.into()),
        };
        Self {
            code,
            phase,
            ..Self::default()
        }
    }

    /// Check the code and both passwords before any request is made.
    /// Returns the code and new password when the request may go out.
    pub fn begin(&mut self) -> Option<(String, String)> {
        let Some(code) = self.code.clone() else {
            self.phase = Phase::Error(MISSING_CODE.into());
            return None;
        };
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            self.phase = Phase::Error(PASSWORD_TOO_SHORT.into());
            return None;
        }
        if self.password != self.confirm_password {
            self.phase = Phase::Error("Passwords do not match.".into());
            return None;
        }
        self.phase = Phase::Submitting;
        Some((code, self.password.clone()))
    }

    /// Record the outcome. After success the page waits [`REDIRECT_DELAY`]
    /// and goes to `/login`.
    pub fn finish(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.password.clear();
                self.confirm_password.clear();
                self.phase = Phase::Success(RESET_DONE.into());
            }
            Err(error) => self.phase = Phase::Error(reset_message(&error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Server function errors wrap the backend message.
    fn server_error(message: &str) -> String {
        format!("error running server function: {message} (details: None)")
    }

    #[test]
    fn test_login_error_messages() {
        let mut form = LoginForm {
            email: " ada@example.com ".into(),
            password: "secret1".into(),
            ..Default::default()
        };
        assert_eq!(form.begin(), ("ada@example.com".into(), "secret1".into()));
        assert!(form.phase.is_submitting());

        form.finish(Err(server_error(INVALID_CREDENTIALS)));
        assert_eq!(
            form.phase.error(),
            Some("Invalid email or password. Please try again.")
        );

        form.finish(Err(EMAIL_NOT_CONFIRMED.into()));
        assert_eq!(
            form.phase.error(),
            Some("Please verify your email address before logging in.")
        );

        form.finish(Err("Database error: pool timed out".into()));
        assert_eq!(form.phase.error(), Some("Database error: pool timed out"));
    }

    fn filled_registration() -> RegisterForm {
        RegisterForm {
            username: "alice".into(),
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
            email: "alice@example.com".into(),
            password: "secret1".into(),
            phase: Phase::Idle,
        }
    }

    #[test]
    fn test_register_short_username_is_rejected_locally() {
        let mut form = RegisterForm {
            username: "al".into(),
            ..filled_registration()
        };
        assert!(form.begin().is_none());
        assert_eq!(
            form.phase.error(),
            Some("Username must be at least 3 characters long.")
        );
    }

    #[test]
    fn test_register_success_clears_form() {
        let mut form = filled_registration();
        let registration = form.begin().unwrap();
        assert_eq!(registration.display_name(), "Alice Liddell");

        form.finish(Ok(()));
        assert_eq!(form.phase.success(), Some(REGISTERED));
        assert!(form.username.is_empty());
        assert!(form.email.is_empty());
        assert!(form.password.is_empty());
    }

    #[test]
    fn test_register_error_messages() {
        let cases = [
            (USERNAME_TAKEN, "This username is already registered."),
            (EMAIL_TAKEN, "This email is already registered."),
            (WEAK_PASSWORD, PASSWORD_TOO_SHORT),
            (PROFILE_NOT_CREATED, "Error creating user profile. Please try again."),
        ];
        for (backend, shown) in cases {
            let mut form = filled_registration();
            form.begin();
            form.finish(Err(server_error(backend)));
            assert_eq!(form.phase.error(), Some(shown));
        }
    }

    #[test]
    fn test_register_login_link_only_for_duplicates() {
        let mut form = filled_registration();
        form.finish(Err(server_error(EMAIL_TAKEN)));
        assert!(form.suggests_login());

        form.finish(Err(server_error(WEAK_PASSWORD)));
        assert!(!form.suggests_login());
    }

    #[test]
    fn test_forgot_password_success() {
        let mut form = ForgotPasswordForm {
            email: "ada@example.com".into(),
            ..Default::default()
        };
        assert_eq!(form.begin(), "ada@example.com");
        form.finish(Ok(()));
        assert_eq!(form.phase.success(), Some(RESET_SENT));
        assert!(form.email.is_empty());
    }

    #[test]
    fn test_reset_without_code() {
        let mut form = ResetPasswordForm::new(None);
        assert_eq!(form.phase.error(), Some(MISSING_CODE));

        form.password = "secret1".into();
        form.confirm_password = "secret1".into();
        assert!(form.begin().is_none());
        assert_eq!(form.phase.error(), Some(MISSING_CODE));

        assert_eq!(
            ResetPasswordForm::new(Some(String::new())).phase.error(),
            Some(MISSING_CODE)
        );
    }

    #[test]
    fn test_reset_validates_before_request() {
        let mut form = ResetPasswordForm::new(Some("abc".into()));
        assert_eq!(form.phase, Phase::Idle);

        form.password = "short".into();
        form.confirm_password = "short".into();
        assert!(form.begin().is_none());
        assert_eq!(form.phase.error(), Some(PASSWORD_TOO_SHORT));

        form.password = "secret1".into();
        form.confirm_password = "secret2".into();
        assert!(form.begin().is_none());
        assert_eq!(form.phase.error(), Some("Passwords do not match."));

        form.confirm_password = "secret1".into();
        assert_eq!(form.begin(), Some(("abc".into(), "secret1".into())));
        assert!(form.phase.is_submitting());
    }

    #[test]
    fn test_reset_outcomes() {
        let mut form = ResetPasswordForm::new(Some("abc".into()));
        form.password = "secret1".into();
        form.confirm_password = "secret1".into();
        form.begin();

        form.finish(Err(server_error(INVALID_RESET_CODE)));
        assert_eq!(form.phase.error(), Some(INVALID_RESET_CODE));

        form.finish(Ok(()));
        assert_eq!(form.phase.success(), Some(RESET_DONE));
        assert!(form.password.is_empty());
        assert_eq!(REDIRECT_DELAY, Duration::from_secs(3));
    }
}
