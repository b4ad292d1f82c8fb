// Dashboard service - context for the member dashboard of one community
use std::sync::Arc;

use serde::Serialize;

use crate::config::MembershipConfig;
use crate::error::{AppError, Result};
use crate::models::{describe_roles, Community, ResolvedMembership, Role};
use crate::services::{CommunityService, MembershipService};
use crate::store::DocumentStore;

pub struct DashboardService {
    communities: CommunityService,
    memberships: MembershipService,
}

#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub community: Community,
    pub roles: Vec<Role>,
    pub role_description: String,
    pub other_memberships: Vec<ResolvedMembership>,
    /// The community switcher is only useful with more than one membership.
    pub can_switch: bool,
}

#[derive(Debug, Serialize)]
pub struct OtherMembership {
    pub community_id: String,
    pub community_name: String,
    pub roles: String,
}

impl DashboardService {
    pub fn new(store: Arc<dyn DocumentStore>, config: &MembershipConfig) -> Self {
        Self {
            communities: CommunityService::new(Arc::clone(&store)),
            memberships: MembershipService::new(store, config),
        }
    }

    pub async fn context(
        &self,
        uid: &str,
        memberships: &[ResolvedMembership],
        selected_id: &str,
    ) -> Result<DashboardContext> {
        let selected = memberships
            .iter()
            .find(|m| m.community_id == selected_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "You are not a member of community \"{}\".",
                    selected_id
                ))
            })?;

        let community = self.communities.get(selected_id).await?;

        let roles = if selected.roles.is_empty() {
            self.memberships
                .stored_roles(&community, uid)
                .await?
                .unwrap_or_default()
        } else {
            selected.roles.clone()
        };

        let other_memberships: Vec<ResolvedMembership> = memberships
            .iter()
            .filter(|m| m.community_id != selected_id)
            .cloned()
            .collect();

        Ok(DashboardContext {
            role_description: describe_roles(&roles),
            can_switch: memberships.len() > 1,
            community,
            roles,
            other_memberships,
        })
    }
}

impl DashboardContext {
    pub fn others_for_display(&self) -> Vec<OtherMembership> {
        self.other_memberships
            .iter()
            .map(|m| OtherMembership {
                community_id: m.community_id.clone(),
                community_name: m.community_name.clone(),
                roles: describe_roles(&m.roles),
            })
            .collect()
    }
}
