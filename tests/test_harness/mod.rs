//! Shared helpers for driving the router in-process over a `MemoryStore`.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use kolekta::config::Config;
use kolekta::db::Database;
use kolekta::store::{
    CollectionPath, DocPath, Document, DocumentStore, MemoryStore, Result, SetOptions, StoreError,
};
use kolekta::{build_router, AppState};

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        Self::with_store(store.clone(), Arc::new(store))
    }

    /// Router over `backing`, with `store` kept for direct fixture writes.
    pub fn with_store(store: MemoryStore, backing: Arc<dyn DocumentStore>) -> Self {
        let state = AppState {
            db: Database::with_store(backing),
            config: Config::default(),
        };
        Self {
            router: build_router(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router call failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    /// Signs up and returns `(token, uid)`.
    pub async fn signup(&self, display_name: &str, email: &str) -> (String, String) {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({
                    "display_name": display_name,
                    "email": email,
                    "password": "secret1",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {}", body);

        let token = body["access_token"].as_str().expect("missing token").to_string();
        let uid = body["user"]["uid"].as_str().expect("missing uid").to_string();
        (token, uid)
    }

    pub async fn put_community(&self, id: &str, value: Value) {
        put(&self.store, &DocPath::community(id).expect("bad id"), value).await;
    }

    pub async fn put_member(&self, community_id: &str, uid: &str, roles: &[&str]) {
        let path = DocPath::member(community_id, uid).expect("bad member path");
        put(&self.store, &path, json!({ "roles": roles })).await;
    }
}

pub async fn put(store: &MemoryStore, path: &DocPath, value: Value) {
    let doc: Document = value.as_object().cloned().expect("fixture must be an object");
    store
        .set(path, doc, SetOptions::default())
        .await
        .expect("Failed to write fixture");
}

fn is_member_path(path: &DocPath) -> bool {
    path.as_str().contains("/members/")
}

/// Delegates to a `MemoryStore` but fails every membership read.
#[derive(Clone)]
pub struct FailingStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>> {
        if is_member_path(path) {
            return Err(StoreError::Backend("connection reset".to_string()));
        }
        self.inner.get(path).await
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<(String, Document)>> {
        self.inner.list(collection).await
    }

    async fn set(&self, path: &DocPath, doc: Document, options: SetOptions) -> Result<()> {
        self.inner.set(path, doc, options).await
    }

    async fn update(&self, path: &DocPath, fields: Document) -> Result<()> {
        self.inner.update(path, fields).await
    }

    async fn add(&self, collection: &CollectionPath, doc: Document) -> Result<String> {
        self.inner.add(collection, doc).await
    }

    async fn delete(&self, path: &DocPath) -> Result<()> {
        self.inner.delete(path).await
    }
}

/// Delegates to a `MemoryStore`, delaying every membership read.
#[derive(Clone)]
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: Duration,
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>> {
        if is_member_path(path) {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.get(path).await
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<(String, Document)>> {
        self.inner.list(collection).await
    }

    async fn set(&self, path: &DocPath, doc: Document, options: SetOptions) -> Result<()> {
        self.inner.set(path, doc, options).await
    }

    async fn update(&self, path: &DocPath, fields: Document) -> Result<()> {
        self.inner.update(path, fields).await
    }

    async fn add(&self, collection: &CollectionPath, doc: Document) -> Result<String> {
        self.inner.add(collection, doc).await
    }

    async fn delete(&self, path: &DocPath) -> Result<()> {
        self.inner.delete(path).await
    }
}
