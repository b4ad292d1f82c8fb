// Community directory - full listing plus client-side search
use std::sync::Arc;

use crate::models::Community;
use crate::store::{CollectionPath, DocumentStore, Result};

pub struct DirectoryService {
    store: Arc<dyn DocumentStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every readable community document, ordered by id. Documents that do
    /// not decode are skipped.
    pub async fn list(&self) -> Result<Vec<Community>> {
        let docs = self.store.list(&CollectionPath::communities()).await?;
        let communities: Vec<Community> = docs
            .into_iter()
            .filter_map(|(id, doc)| match Community::from_document(&id, doc) {
                Ok(community) => Some(community),
                Err(e) => {
                    tracing::warn!(community_id = %id, "Skipping unreadable community: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!(count = communities.len(), "Loaded community directory");
        Ok(communities)
    }
}

/// Case-insensitive substring match on name or address. An empty search
/// keeps everything.
pub fn filter_communities<'a>(communities: &'a [Community], search: &str) -> Vec<&'a Community> {
    let needle = search.to_lowercase();
    communities
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.address.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{to_document, DocPath, MemoryStore, SetOptions};

    fn community(name: &str, address: &str) -> Community {
        Community {
            name: name.to_string(),
            address: address.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_matches_name_case_insensitively() {
        let communities = vec![community("Ahavat Hesed", ""), community("Or Hadash", "")];
        let names: Vec<&str> = filter_communities(&communities, "or")
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Or Hadash"]);
    }

    #[test]
    fn test_filter_matches_address() {
        let communities = vec![
            community("Ahavat Hesed Jerusalem", "123 Kindness St, Jerusalem"),
            community("Tiferet Moshe Tel Aviv", "456 Glory Ave, Tel Aviv"),
        ];
        let found = filter_communities(&communities, "GLORY");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Tiferet Moshe Tel Aviv");
    }

    #[test]
    fn test_empty_search_keeps_everything() {
        let communities = vec![community("A", ""), community("", "")];
        assert_eq!(filter_communities(&communities, "").len(), 2);
        assert!(filter_communities(&communities, "zzz").is_empty());
    }

    #[tokio::test]
    async fn test_list_reads_all_documents() {
        let store = MemoryStore::new();
        for (id, name) in [("b", "Beta"), ("a", "Alpha")] {
            store
                .set(
                    &DocPath::community(id).unwrap(),
                    to_document(&community(name, "")).unwrap(),
                    SetOptions::default(),
                )
                .await
                .unwrap();
        }

        let listed = DirectoryService::new(Arc::new(store)).list().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(listed[0].name, "Alpha");
    }

    #[tokio::test]
    async fn test_list_survives_malformed_documents() {
        let store = MemoryStore::new();
        for (id, value) in [
            ("a-good", serde_json::json!({"name": "Or Hadash"})),
            ("b-nulls", serde_json::json!({"adminUserIds": null, "name": null})),
            ("c-broken", serde_json::json!({"upcomingEvents": "soon"})),
        ] {
            store
                .set(
                    &DocPath::community(id).unwrap(),
                    value.as_object().cloned().unwrap(),
                    SetOptions::default(),
                )
                .await
                .unwrap();
        }

        let listed = DirectoryService::new(Arc::new(store)).list().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a-good", "b-nulls"]);
        assert!(listed[1].admin_user_ids.is_empty());
    }
}
