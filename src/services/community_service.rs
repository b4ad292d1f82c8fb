// Community profile - detail view and the admin edit form
use std::sync::Arc;

use serde::Serialize;

use crate::authz::{authorize, Permission};
use crate::error::{AppError, Result};
use crate::models::{Community, CommunityEdit};
use crate::store::{DocPath, DocumentStore};

pub struct CommunityService {
    store: Arc<dyn DocumentStore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityDetail {
    pub community: Community,
    pub can_edit: bool,
}

impl CommunityService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, community_id: &str) -> Result<Community> {
        if community_id.trim().is_empty() {
            return Err(AppError::BadRequest("No community selected.".to_string()));
        }

        let path = DocPath::community(community_id)?;
        let doc = self.store.get(&path).await?.ok_or_else(|| {
            AppError::NotFound(format!("Community with ID \"{}\" not found.", community_id))
        })?;

        Ok(Community::from_document(community_id, doc)?)
    }

    pub async fn detail(&self, community_id: &str, viewer: Option<&str>) -> Result<CommunityDetail> {
        let community = self.get(community_id).await?;
        let can_edit = authorize(viewer, &community, Permission::EditCommunity);

        Ok(CommunityDetail {
            community,
            can_edit,
        })
    }

    /// Writes name, address and contact, then returns the document as it
    /// was read merged with the edit. The store is not re-read.
    pub async fn save(
        &self,
        community_id: &str,
        editor: &str,
        edit: CommunityEdit,
    ) -> Result<Community> {
        let mut community = self.get(community_id).await?;
        if !authorize(Some(editor), &community, Permission::EditCommunity) {
            tracing::warn!(community_id = %community_id, uid = %editor, "Edit rejected: not a community admin");
            return Err(AppError::Forbidden);
        }

        let path = DocPath::community(community_id)?;
        self.store.update(&path, edit.to_fields()).await?;
        community.apply_edit(&edit);

        tracing::info!(community_id = %community_id, uid = %editor, "Community details updated");
        Ok(community)
    }
}
