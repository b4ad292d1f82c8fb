use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthError, AuthUser};
use crate::store::{self, DocPath, DocumentStore, SetOptions};
use crate::utils::{mask_email, normalize_email};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    uid: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Email/password accounts kept in the `accounts` collection, keyed by the
/// normalized email.
#[derive(Clone)]
pub struct AccountStore {
    store: Arc<dyn DocumentStore>,
}

impl AccountStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let key = normalize_email(email);
        let path = DocPath::account(&key).map_err(|_| AuthError::InvalidEmail)?;
        if self.store.get(&path).await?.is_some() {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let account = Account {
            uid: Uuid::new_v4().simple().to_string(),
            email: key,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };
        self.store
            .set(&path, store::to_document(&account)?, SetOptions::default())
            .await?;

        tracing::info!(uid = %account.uid, email = %mask_email(&account.email), "Account created");

        Ok(AuthUser {
            uid: account.uid,
            email: account.email,
        })
    }

    pub async fn verify(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        validate_email(email)?;

        let key = normalize_email(email);
        let path = DocPath::account(&key).map_err(|_| AuthError::InvalidEmail)?;
        let account: Account = store::fetch(self.store.as_ref(), &path)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &account.password_hash)?;

        Ok(AuthUser {
            uid: account.uid,
            email: account.email,
        })
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    if email.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(AuthError::InvalidEmail);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::InvalidEmail);
    };
    let domain_ok = domain
        .split_once('.')
        .map(|(head, tail)| !head.is_empty() && !tail.is_empty() && !tail.ends_with('.'))
        .unwrap_or(false);

    if local.is_empty() || domain.contains('@') || !domain_ok {
        return Err(AuthError::InvalidEmail);
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Backend(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Backend(format!("Invalid password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(()),
        Err(argon2::password_hash::Error::Password) => Err(AuthError::WrongPassword),
        Err(e) => Err(AuthError::Backend(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}
