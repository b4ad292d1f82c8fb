// Membership resolution - which communities the signed-in user belongs to
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{stream, StreamExt, TryStreamExt};

use crate::authz::effective_roles;
use crate::config::MembershipConfig;
use crate::error::{AppError, Result};
use crate::models::{parse_roles, Community, Membership, ResolvedMembership, Role};
use crate::store::{self, CollectionPath, DocPath, DocumentStore};

/// Scans every community for a `members/{uid}` record.
///
/// There is no per-user index of memberships, so the cost is one point read
/// per community no matter how many memberships the user has. Probes run
/// concurrently up to `max_concurrency` and the whole scan shares one
/// timeout.
pub struct MembershipService {
    store: Arc<dyn DocumentStore>,
    max_concurrency: usize,
    timeout: Duration,
}

impl MembershipService {
    pub fn new(store: Arc<dyn DocumentStore>, config: &MembershipConfig) -> Self {
        Self {
            store,
            max_concurrency: config.max_concurrency.max(1),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Memberships of `uid`, in directory order.
    pub async fn resolve(&self, uid: &str) -> Result<Vec<ResolvedMembership>> {
        let started = Instant::now();

        let scan = async {
            let communities = self.store.list(&CollectionPath::communities()).await?;
            let total = communities.len();

            let found: Vec<Option<ResolvedMembership>> = stream::iter(communities)
                .map(|(id, doc)| {
                    let store = Arc::clone(&self.store);
                    async move {
                        let community = match Community::from_document(&id, doc) {
                            Ok(community) => community,
                            Err(e) => {
                                tracing::warn!(community_id = %id, "Skipping unreadable community: {}", e);
                                return Ok(None);
                            }
                        };
                        probe(store.as_ref(), &community, uid).await
                    }
                })
                .buffered(self.max_concurrency)
                .try_collect()
                .await?;

            Ok::<_, AppError>((total, found.into_iter().flatten().collect::<Vec<_>>()))
        };

        let (total, memberships) = tokio::time::timeout(self.timeout, scan)
            .await
            .map_err(|_| {
                tracing::warn!(uid = %uid, timeout_ms = self.timeout.as_millis() as u64, "Membership scan timed out");
                AppError::Timeout("Loading your communities took too long.".to_string())
            })??;

        tracing::info!(
            uid = %uid,
            communities = total,
            memberships = memberships.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Membership scan completed"
        );

        Ok(memberships)
    }

    /// Point read of a single membership record; `None` when absent.
    pub async fn stored_roles(&self, community: &Community, uid: &str) -> Result<Option<Vec<Role>>> {
        let path = DocPath::member(&community.id, uid)?;
        let membership: Option<Membership> = store::fetch(self.store.as_ref(), &path).await?;

        Ok(membership.map(|m| effective_roles(uid, community, &parse_roles(&m.roles))))
    }
}

async fn probe(
    store: &dyn DocumentStore,
    community: &Community,
    uid: &str,
) -> std::result::Result<Option<ResolvedMembership>, store::StoreError> {
    let path = DocPath::member(&community.id, uid)?;
    let Some(doc) = store.get(&path).await? else {
        return Ok(None);
    };
    // The record's existence is the membership; unreadable roles count as none.
    let membership = store::from_document::<Membership>(doc).unwrap_or_else(|e| {
        tracing::warn!(community_id = %community.id, uid = %uid, "Unreadable membership record: {}", e);
        Membership::default()
    });

    tracing::debug!(community_id = %community.id, uid = %uid, "Membership found");

    Ok(Some(ResolvedMembership {
        community_id: community.id.clone(),
        community_name: community.display_name().to_string(),
        roles: effective_roles(uid, community, &parse_roles(&membership.roles)),
    }))
}
