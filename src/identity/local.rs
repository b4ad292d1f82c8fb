use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use super::{AccountStore, AuthError, AuthState, AuthUser, IdentityProvider};
use crate::store::DocumentStore;

/// In-process identity provider holding one signed-in session.
pub struct LocalIdentityProvider {
    accounts: AccountStore,
    state: watch::Sender<AuthState>,
}

impl LocalIdentityProvider {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            accounts: AccountStore::new(store),
            state,
        }
    }

    /// Finishes the initial session check, optionally with a persisted user.
    pub fn restore(&self, user: Option<AuthUser>) {
        self.state.send_replace(AuthState {
            user,
            initialized: true,
        });
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    fn publish(&self, user: Option<AuthUser>) {
        tracing::debug!(uid = ?user.as_ref().map(|u| u.uid.as_str()), "Auth state changed");
        self.state.send_replace(AuthState {
            user,
            initialized: true,
        });
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.accounts.create(email, password).await?;
        self.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.accounts.verify(email, password).await?;
        self.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.publish(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
