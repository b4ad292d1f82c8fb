//! Identity provider seam: email/password accounts and the auth-state stream.

mod accounts;
mod local;

pub use accounts::{AccountStore, MIN_PASSWORD_LEN};
pub use local::LocalIdentityProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::store::StoreError;

/// Authenticated principal as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Snapshot published on every auth-state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    /// False until the provider has finished its initial session check.
    pub initialized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("auth/email-already-in-use")]
    EmailAlreadyInUse,

    #[error("auth/weak-password")]
    WeakPassword,

    #[error("auth/invalid-email")]
    InvalidEmail,

    #[error("auth/user-not-found")]
    UserNotFound,

    #[error("auth/wrong-password")]
    WrongPassword,

    #[error("auth/invalid-credential")]
    InvalidCredential,

    #[error("auth/internal-error: {0}")]
    Backend(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthError::WeakPassword => "auth/weak-password",
            AuthError::InvalidEmail => "auth/invalid-email",
            AuthError::UserNotFound => "auth/user-not-found",
            AuthError::WrongPassword => "auth/wrong-password",
            AuthError::InvalidCredential => "auth/invalid-credential",
            AuthError::Backend(_) => "auth/internal-error",
        }
    }

    pub fn user_message(&self) -> &'static str {
        message_for_code(self.code())
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        AuthError::Backend(e.to_string())
    }
}

pub const GENERIC_AUTH_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Maps a provider error code to the message shown next to the login form.
pub fn message_for_code(code: &str) -> &'static str {
    match code {
        "auth/email-already-in-use" => {
            "This email address is already in use. Please try logging in or use a different email."
        }
        "auth/weak-password" => {
            "The password is too weak. Please use a stronger password (at least 6 characters)."
        }
        "auth/invalid-email" => "The email address is not valid.",
        "auth/user-not-found" | "auth/wrong-password" | "auth/invalid-credential" => {
            "Invalid login credentials. Please check your email and password."
        }
        _ => GENERIC_AUTH_MESSAGE,
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Auth-state stream; the receiver always holds the latest state.
    fn subscribe(&self) -> watch::Receiver<AuthState>;
}
