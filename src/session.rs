//! Session tracker: the single subscriber to the identity provider's
//! auth-state stream.

use tokio::sync::watch;

use crate::identity::{AuthState, AuthUser, IdentityProvider};

pub struct SessionTracker {
    rx: watch::Receiver<AuthState>,
}

impl SessionTracker {
    pub fn subscribe(provider: &dyn IdentityProvider) -> Self {
        Self {
            rx: provider.subscribe(),
        }
    }

    pub fn current(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.rx.borrow().user.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.rx.borrow().initialized
    }

    /// Waits for the next auth event and returns it. `None` once the
    /// provider is gone.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Waits until the initial session check completes. There is no timeout:
    /// a provider that never reports keeps the caller waiting.
    pub async fn wait_initialized(&mut self) -> Option<AuthState> {
        self.rx
            .wait_for(|state| state.initialized)
            .await
            .ok()
            .map(|state| (*state).clone())
    }
}
