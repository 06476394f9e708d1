//! Session handlers: login, logout, registration and the account routes.
//!
//! Each handler is one request followed by either a redirect or a notice.
//! Nothing is retried; a rejected request leaves the user where they are.

use std::sync::Arc;

use serde::Deserialize;

use stockguard_core::{
    Credentials, DomainError, PasswordReset, PasswordResetRequest, ProfileUpdate, Registration,
};

use crate::api::{ApiClient, ApiError, ApiResult, BodyEncoding};
use crate::navigation::{Navigator, Page};
use crate::notify::{Notice, Notifier};
use crate::routes;

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
}

/// Failure of an account action, already shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Invalid(#[from] DomainError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type AccountResult<T> = Result<T, AccountError>;

/// Login/logout/registration wiring.
///
/// `dialog` receives blocking notices (login, logout); `flash` receives the
/// transient ones (registration, password and profile actions).
#[derive(Clone)]
pub struct AccountService {
    client: ApiClient,
    navigator: Arc<dyn Navigator>,
    dialog: Arc<dyn Notifier>,
    flash: Arc<dyn Notifier>,
    encoding: BodyEncoding,
}

impl AccountService {
    pub fn new(
        client: ApiClient,
        navigator: Arc<dyn Navigator>,
        dialog: Arc<dyn Notifier>,
        flash: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            navigator,
            dialog,
            flash,
            encoding: BodyEncoding::Json,
        }
    }

    /// Encoding of form posts (login, registration).
    pub fn with_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Exchange credentials for a token, store it, go to the dashboard.
    pub async fn login(&self, credentials: &Credentials) -> AccountResult<()> {
        let endpoint = routes::LOGIN;
        let result: ApiResult<TokenBody> = self
            .client
            .send_json(&endpoint, endpoint.path, credentials, self.encoding)
            .await;

        let body = match result {
            Ok(body) => body,
            Err(err) => return Err(self.rejected(&*self.dialog, "Login failed", err)),
        };

        if let Err(err) = self
            .client
            .session()
            .sign_in(&body.access_token, &credentials.username)
        {
            return Err(self.rejected(&*self.dialog, "Login failed", err.into()));
        }
        tracing::info!(username = %credentials.username, "logged in");

        self.dialog.notify(Notice::success("Login successful!"));
        self.navigator.navigate(Page::Dashboard);
        Ok(())
    }

    /// Revoke the session server-side, then forget it locally.
    ///
    /// On rejection the stored token is kept and no redirect happens.
    pub async fn logout(&self) -> AccountResult<()> {
        let endpoint = routes::LOGOUT;
        let result = self
            .client
            .send_for_message::<()>(&endpoint, endpoint.path, None, self.encoding)
            .await;

        if let Err(err) = result {
            return Err(self.rejected(&*self.dialog, "Logout failed", err));
        }

        if let Err(err) = self.client.session().sign_out() {
            return Err(self.rejected(&*self.dialog, "Logout failed", err.into()));
        }
        tracing::info!("logged out");
        self.navigator.navigate(Page::Login);
        Ok(())
    }

    /// Check the confirmation locally, then register and go to login.
    pub async fn register(&self, registration: &Registration) -> AccountResult<()> {
        if let Err(err) = registration.validate() {
            tracing::debug!(error = %err, "registration rejected locally");
            self.flash.notify(Notice::error(err.to_string()));
            return Err(err.into());
        }

        let endpoint = routes::REGISTER;
        let result = self
            .client
            .send_for_message(&endpoint, endpoint.path, Some(registration), self.encoding)
            .await;

        if let Err(err) = result {
            return Err(self.rejected(&*self.flash, "Registration failed", err));
        }

        tracing::info!(username = %registration.username, role = %registration.role, "registered");
        self.flash.notify(Notice::success("Registration successful!"));
        self.navigator.navigate(Page::Login);
        Ok(())
    }

    /// Ask the backend to mail a reset link.
    pub async fn request_password_reset(&self, email: &str) -> AccountResult<()> {
        let endpoint = routes::REQUEST_PASSWORD_RESET;
        let body = PasswordResetRequest {
            email: email.to_string(),
        };
        let result = self
            .client
            .send_for_message(&endpoint, endpoint.path, Some(&body), BodyEncoding::Json)
            .await;
        self.flash_outcome(result, "Password reset request failed", "Password reset link sent")
    }

    /// Set a new password using the token from the reset link.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AccountResult<()> {
        if new_password.is_empty() {
            let err = DomainError::validation("Password cannot be empty");
            self.flash.notify(Notice::error(err.to_string()));
            return Err(err.into());
        }

        let endpoint = routes::RESET_PASSWORD;
        let path = endpoint.resolve(&[("token", token)]);
        let body = PasswordReset {
            new_password: new_password.to_string(),
        };
        let result = self
            .client
            .send_for_message(&endpoint, &path, Some(&body), BodyEncoding::Json)
            .await;
        self.flash_outcome(result, "Password reset failed", "Password reset successfully")?;
        self.navigator.navigate(Page::Login);
        Ok(())
    }

    /// Update the signed-in user's profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AccountResult<()> {
        if update.is_empty() {
            let err = DomainError::validation("Nothing to update");
            self.flash.notify(Notice::error(err.to_string()));
            return Err(err.into());
        }

        let endpoint = routes::UPDATE_PROFILE;
        let result = self
            .client
            .send_for_message(&endpoint, endpoint.path, Some(update), BodyEncoding::Json)
            .await;
        let message = match result {
            Ok(message) => message,
            Err(err) => return Err(self.rejected(&*self.flash, "Profile update failed", err)),
        };

        if let Some(username) = &update.username {
            if let Err(err) = self.client.session().rename(username) {
                return Err(self.rejected(&*self.flash, "Profile update failed", err.into()));
            }
        }

        let text = message.unwrap_or_else(|| "Profile updated successfully".to_string());
        self.flash.notify(Notice::success(text));
        Ok(())
    }

    fn flash_outcome(
        &self,
        result: ApiResult<Option<String>>,
        failure: &str,
        fallback: &str,
    ) -> AccountResult<()> {
        match result {
            Ok(message) => {
                let text = message.unwrap_or_else(|| fallback.to_string());
                self.flash.notify(Notice::success(text));
                Ok(())
            }
            Err(err) => Err(self.rejected(&*self.flash, failure, err)),
        }
    }

    /// Show `<action>: <reason>` and hand the error back.
    fn rejected(&self, notifier: &dyn Notifier, action: &str, err: ApiError) -> AccountError {
        let reason = match &err {
            ApiError::Http { message, .. } => message.clone(),
            other => {
                tracing::error!(error = %other, action, "account request failed");
                other.to_string()
            }
        };
        tracing::warn!(action, %reason, "account action rejected");
        notifier.notify(Notice::error(format!("{action}: {reason}")));
        AccountError::Api(err)
    }
}

impl core::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccountService")
            .field("client", &self.client)
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}
