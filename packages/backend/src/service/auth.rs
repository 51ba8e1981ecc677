use store::{NewProfile, Registration, UserInfo};

use super::Service;
use crate::client::check_password;
use crate::error::{BackendError, Result};

const MIN_USERNAME_LEN: usize = 3;

impl Service {
    /// Create an account and its profile.
    ///
    /// The username is checked before the account exists. If the profile
    /// insert still fails (a concurrent registration took the username, or
    /// storage refused the row) the account is deleted again, so every
    /// account that survives registration has a profile.
    pub async fn register(&self, form: Registration) -> Result<UserInfo> {
        let username = form.username.trim().to_string();
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(BackendError::Validation(format!(
                "Username must be at least {MIN_USERNAME_LEN} characters"
            )));
        }
        if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
            return Err(BackendError::Validation(
                "First and last name are required".into(),
            ));
        }
        if self.backend.username_exists(&username).await? {
            tracing::warn!(%username, "Registration refused, username taken");
            return Err(BackendError::UsernameTaken);
        }

        let user = self
            .backend
            .sign_up(&form.email, &form.password, &form.display_name())
            .await?;

        let profile = NewProfile {
            user_id: user.id.clone(),
            username,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
        };
        if let Err(e) = self.backend.insert_profile(profile).await {
            tracing::error!("Error creating user profile: {e}");
            if let Err(cleanup) = self.backend.delete_user(&user.id).await {
                tracing::error!(user = %user.id, "Failed to remove account without profile: {cleanup}");
            }
            return Err(match e {
                BackendError::UsernameTaken => e,
                other => BackendError::ProfileNotCreated(Box::new(other)),
            });
        }

        tracing::info!(user = %user.id, "Registered new user");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserInfo> {
        self.backend
            .sign_in_with_password(email, password)
            .await
            .inspect(|user| tracing::info!(user = %user.id, "User logged in"))
    }

    pub async fn current_user(&self, user_id: &str) -> Result<Option<UserInfo>> {
        self.backend.get_user(user_id).await
    }

    /// Mail a reset link pointing at the configured reset page.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(BackendError::Validation("Email is required".into()));
        }
        self.backend
            .reset_password_for_email(email, &self.settings.auth.redirect)
            .await
            .inspect_err(|e| tracing::error!("Error requesting password reset: {e}"))
    }

    /// Consume `code` and set a new password for the account it belongs to.
    pub async fn reset_password(&self, code: &str, password: &str) -> Result<()> {
        if code.trim().is_empty() {
            return Err(BackendError::InvalidResetCode);
        }
        check_password(password)?;
        let user = self.backend.exchange_reset_code(code.trim()).await?;
        self.backend.update_user_password(&user.id, password).await?;
        tracing::info!(user = %user.id, "Password reset");
        Ok(())
    }
}
