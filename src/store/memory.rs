use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    generate_id, merge_documents, CollectionPath, DocPath, Document, DocumentStore, Result,
    SetOptions, StoreError,
};

/// In-process store used for local development and tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<RwLock<BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>> {
        Ok(self.docs.read().await.get(path.as_str()).cloned())
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<(String, Document)>> {
        let prefix = format!("{}/", collection.as_str());
        let docs = self.docs.read().await;

        Ok(docs
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, doc)| {
                let id = &key[prefix.len()..];
                // Skip documents of nested sub-collections.
                (!id.contains('/')).then(|| (id.to_string(), doc.clone()))
            })
            .collect())
    }

    async fn set(&self, path: &DocPath, doc: Document, options: SetOptions) -> Result<()> {
        let mut docs = self.docs.write().await;
        match docs.get_mut(path.as_str()) {
            Some(existing) if options.merge => merge_documents(existing, doc),
            _ => {
                docs.insert(path.as_str().to_string(), doc);
            }
        }
        Ok(())
    }

    async fn update(&self, path: &DocPath, fields: Document) -> Result<()> {
        let mut docs = self.docs.write().await;
        let existing = docs
            .get_mut(path.as_str())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        existing.extend(fields);
        Ok(())
    }

    async fn add(&self, collection: &CollectionPath, doc: Document) -> Result<String> {
        let id = generate_id();
        let path = collection.doc(&id)?;
        self.docs.write().await.insert(path.as_str().to_string(), doc);
        Ok(id)
    }

    async fn delete(&self, path: &DocPath) -> Result<()> {
        self.docs.write().await.remove(path.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_list_excludes_subcollections() {
        let store = MemoryStore::new();
        store
            .set(
                &DocPath::community("a").unwrap(),
                doc(json!({"name": "A"})),
                SetOptions::default(),
            )
            .await
            .unwrap();
        store
            .set(
                &DocPath::member("a", "u1").unwrap(),
                doc(json!({"roles": ["member"]})),
                SetOptions::default(),
            )
            .await
            .unwrap();
        store
            .set(
                &DocPath::community("b").unwrap(),
                doc(json!({"name": "B"})),
                SetOptions::default(),
            )
            .await
            .unwrap();

        let listed = store.list(&CollectionPath::communities()).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let members = store
            .list(&CollectionPath::members("a").unwrap())
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].0, "u1");
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .update(
                &DocPath::community("missing").unwrap(),
                doc(json!({"name": "x"})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_merge_keeps_other_fields() {
        let store = MemoryStore::new();
        let path = DocPath::user("u1").unwrap();
        store
            .set(
                &path,
                doc(json!({"displayName": "Sarah", "preferredLanguage": "en"})),
                SetOptions::default(),
            )
            .await
            .unwrap();
        store
            .set(&path, doc(json!({"displayName": "Sarah Cohen"})), SetOptions::merge())
            .await
            .unwrap();

        let stored = store.get(&path).await.unwrap().unwrap();
        assert_eq!(stored["displayName"], "Sarah Cohen");
        assert_eq!(stored["preferredLanguage"], "en");

        store
            .set(&path, doc(json!({"displayName": "Replaced"})), SetOptions::default())
            .await
            .unwrap();
        let stored = store.get(&path).await.unwrap().unwrap();
        assert!(stored.get("preferredLanguage").is_none());
    }

    #[tokio::test]
    async fn test_add_generates_distinct_ids() {
        let store = MemoryStore::new();
        let collection = CollectionPath::announcements("a").unwrap();
        let first = store.add(&collection, doc(json!({"title": "1"}))).await.unwrap();
        let second = store.add(&collection, doc(json!({"title": "2"}))).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.list(&collection).await.unwrap().len(), 2);
    }
}
