// User profiles - the `users/{uid}` documents written at sign-up
use std::sync::Arc;

use crate::identity::AuthUser;
use crate::models::UserProfile;
use crate::store::{self, DocPath, DocumentStore, Result, SetOptions};

pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create_profile(&self, user: &AuthUser, display_name: &str) -> Result<UserProfile> {
        let profile = UserProfile::new(&user.uid, &user.email, display_name);
        self.store
            .set(
                &DocPath::user(&user.uid)?,
                store::to_document(&profile)?,
                SetOptions::default(),
            )
            .await?;

        tracing::info!(uid = %user.uid, "User profile created");
        Ok(profile)
    }

    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        store::fetch(self.store.as_ref(), &DocPath::user(uid)?).await
    }

    /// Stored profile, or one derived from the auth record when the
    /// profile write never happened.
    pub async fn profile_or_default(&self, user: &AuthUser) -> Result<UserProfile> {
        Ok(self
            .get_profile(&user.uid)
            .await?
            .unwrap_or_else(|| UserProfile {
                created_at: None,
                ..UserProfile::new(&user.uid, &user.email, "")
            }))
    }
}
