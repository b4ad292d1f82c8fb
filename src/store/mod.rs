//! Document store abstraction.
//!
//! Documents are JSON objects addressed by slash-separated paths that
//! alternate collection and document ids: `communities/{id}` is a document,
//! `communities/{id}/members` is a collection of sub-documents.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::fmt;

use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

pub type Document = Map<String, Value>;

const AUTO_ID_LEN: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

fn check_segment(segment: &str) -> Result<&str> {
    if segment.is_empty() || segment.contains('/') || segment.trim() != segment {
        return Err(StoreError::InvalidPath(format!("bad segment {:?}", segment)));
    }
    Ok(segment)
}

/// Path of a collection; always an odd number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

/// Path of a single document; always an even number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath(String);

impl CollectionPath {
    pub fn users() -> Self {
        Self("users".to_string())
    }

    pub fn communities() -> Self {
        Self("communities".to_string())
    }

    pub fn accounts() -> Self {
        Self("accounts".to_string())
    }

    pub fn members(community_id: &str) -> Result<Self> {
        Ok(Self(format!("communities/{}/members", check_segment(community_id)?)))
    }

    pub fn announcements(community_id: &str) -> Result<Self> {
        Ok(Self(format!(
            "communities/{}/announcements",
            check_segment(community_id)?
        )))
    }

    pub fn doc(&self, id: &str) -> Result<DocPath> {
        Ok(DocPath(format!("{}/{}", self.0, check_segment(id)?)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw.split('/').collect();
        if segments.len() % 2 != 0 {
            return Err(StoreError::InvalidPath(format!(
                "{} does not name a document",
                raw
            )));
        }
        for segment in &segments {
            check_segment(segment)?;
        }
        Ok(Self(raw.to_string()))
    }

    pub fn user(uid: &str) -> Result<Self> {
        CollectionPath::users().doc(uid)
    }

    pub fn community(community_id: &str) -> Result<Self> {
        CollectionPath::communities().doc(community_id)
    }

    pub fn member(community_id: &str, uid: &str) -> Result<Self> {
        CollectionPath::members(community_id)?.doc(uid)
    }

    pub fn account(key: &str) -> Result<Self> {
        CollectionPath::accounts().doc(key)
    }

    /// Last segment of the path.
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn collection(&self) -> CollectionPath {
        match self.0.rsplit_once('/') {
            Some((parent, _)) => CollectionPath(parent.to_string()),
            None => CollectionPath(String::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Merge into an existing document instead of replacing it.
    pub merge: bool,
}

impl SetOptions {
    pub fn merge() -> Self {
        Self { merge: true }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>>;

    /// All documents directly inside `collection`, ordered by id.
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<(String, Document)>>;

    async fn set(&self, path: &DocPath, doc: Document, options: SetOptions) -> Result<()>;

    /// Overwrites the given top-level fields. Fails with `NotFound` if the
    /// document does not exist.
    async fn update(&self, path: &DocPath, fields: Document) -> Result<()>;

    /// Creates a document with a generated id and returns the id.
    async fn add(&self, collection: &CollectionPath, doc: Document) -> Result<String>;

    async fn delete(&self, path: &DocPath) -> Result<()>;
}

pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}

/// Deep-merges `patch` into `target`: nested objects merge, everything else
/// is replaced.
pub fn merge_documents(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_documents(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Backend(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Point read decoded into `T`.
pub async fn fetch<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    path: &DocPath,
) -> Result<Option<T>> {
    store.get(path).await?.map(from_document).transpose()
}
