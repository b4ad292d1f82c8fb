//! In-process client controller.
//!
//! Drives the view state from auth events: each session change is folded
//! into the reducer and, for a signed-in user, followed by a membership scan.

use std::sync::Arc;

use crate::config::MembershipConfig;
use crate::error::{AppError, Result};
use crate::identity::{AuthState, IdentityProvider};
use crate::navigation::{reduce, Action, ViewState};
use crate::services::{MembershipService, UserService};
use crate::session::SessionTracker;
use crate::store::DocumentStore;

pub struct Shell {
    identity: Arc<dyn IdentityProvider>,
    session: SessionTracker,
    memberships: MembershipService,
    users: UserService,
    state: ViewState,
}

impl Shell {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        config: &MembershipConfig,
    ) -> Self {
        let session = SessionTracker::subscribe(identity.as_ref());
        Self {
            identity,
            session,
            memberships: MembershipService::new(Arc::clone(&store), config),
            users: UserService::new(store),
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> &ViewState {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
        &self.state
    }

    /// Waits for the initial auth check and applies it. Returns `None` if
    /// the provider went away first.
    pub async fn start(&mut self) -> Option<&ViewState> {
        let auth = self.session.wait_initialized().await?;
        self.apply(auth).await;
        Some(&self.state)
    }

    /// Waits for the next auth event and applies it.
    pub async fn next_event(&mut self) -> Option<&ViewState> {
        let auth = self.session.changed().await?;
        self.apply(auth).await;
        Some(&self.state)
    }

    async fn apply(&mut self, auth: AuthState) {
        if !auth.initialized {
            return;
        }

        let user_id = auth.user.map(|user| user.uid);
        self.dispatch(Action::AuthResolved {
            user_id: user_id.clone(),
        });

        let Some(uid) = user_id else {
            return;
        };

        match self.memberships.resolve(&uid).await {
            Ok(memberships) => {
                self.dispatch(Action::MembershipsResolved(memberships));
            }
            Err(e) => {
                tracing::error!(uid = %uid, "Error fetching user memberships: {}", e);
                self.dispatch(Action::MembershipsFailed(e.to_string()));
            }
        }
    }

    /// Creates the account and its profile, then processes the resulting
    /// auth event. Errors display as the message shown next to the form.
    pub async fn sign_up(&mut self, display_name: &str, email: &str, password: &str) -> Result<()> {
        if display_name.trim().is_empty() {
            return Err(AppError::BadRequest("Please enter a display name.".to_string()));
        }

        let user = self.identity.sign_up(email, password).await?;
        if let Err(e) = self.users.create_profile(&user, display_name).await {
            tracing::error!(uid = %user.uid, "Error creating user profile: {}", e);
        }

        self.dispatch(Action::LoginSucceeded);
        self.next_event().await;
        Ok(())
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<()> {
        self.identity.sign_in(email, password).await?;
        self.dispatch(Action::LoginSucceeded);
        self.next_event().await;
        Ok(())
    }

    pub async fn sign_out(&mut self) -> Result<()> {
        self.identity.sign_out().await?;
        self.dispatch(Action::LoggedOut);
        self.next_event().await;
        Ok(())
    }
}
