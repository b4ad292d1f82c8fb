//! Membership Resolution Integration Tests
//!
//! Purpose: Verify how store failures and slow stores surface through the
//! resolver, the HTTP landing view and the in-process shell
//!
//! Run: cargo test --test membership_resolution_test

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::json;

mod test_harness;
use test_harness::{put, FailingStore, SlowStore, TestApp};

use kolekta::config::MembershipConfig;
use kolekta::error::AppError;
use kolekta::identity::{IdentityProvider, LocalIdentityProvider};
use kolekta::navigation::View;
use kolekta::services::MembershipService;
use kolekta::shell::Shell;
use kolekta::store::{DocPath, MemoryStore};

async fn seed_membership(store: &MemoryStore, uid: &str) {
    put(
        store,
        &DocPath::community("ahavat-hesed-jlm").expect("bad id"),
        json!({"name": "Ahavat Hesed Jerusalem"}),
    )
    .await;
    put(
        store,
        &DocPath::member("ahavat-hesed-jlm", uid).expect("bad path"),
        json!({"roles": ["member"]}),
    )
    .await;
}

#[tokio::test]
async fn test_failed_scan_is_reported_in_home_view() {
    let store = MemoryStore::new();
    let app = TestApp::with_store(
        store.clone(),
        Arc::new(FailingStore {
            inner: store.clone(),
        }),
    );
    let (token, uid) = app.signup("Sarah", "sarah@example.com").await;
    seed_membership(&store, &uid).await;

    let (status, body) = app
        .request(Method::GET, "/api/v1/me/home", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "directory");
    let message = body["membership_error"].as_str().expect("missing error message");
    assert!(message.contains("connection reset"), "got: {}", message);

    // The raw memberships endpoint reports the failure as an error
    let (status, _) = app
        .request(Method::GET, "/api/v1/me/memberships", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_slow_scan_times_out_as_a_whole() {
    let store = MemoryStore::new();
    seed_membership(&store, "u1").await;
    let slow = SlowStore {
        inner: store,
        delay: Duration::from_millis(500),
    };
    let config = MembershipConfig {
        max_concurrency: 4,
        timeout_ms: 50,
    };

    let started = tokio::time::Instant::now();
    let err = MembershipService::new(Arc::new(slow), &config)
        .resolve("u1")
        .await
        .expect_err("scan should time out");

    assert!(matches!(err, AppError::Timeout(_)));
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_shell_falls_back_to_directory_when_scan_fails() {
    let store = MemoryStore::new();
    let provider = Arc::new(LocalIdentityProvider::new(Arc::new(store.clone())));
    let user = provider
        .accounts()
        .create("sarah@example.com", "secret1")
        .await
        .expect("Failed to create account");
    seed_membership(&store, &user.uid).await;

    let mut shell = Shell::new(
        provider.clone(),
        Arc::new(FailingStore {
            inner: store.clone(),
        }),
        &MembershipConfig::default(),
    );
    provider.restore(None);
    shell.start().await.expect("provider dropped");

    shell
        .sign_in("sarah@example.com", "secret1")
        .await
        .expect("sign-in failed");

    let state = shell.state();
    assert_eq!(state.view, View::Directory);
    assert!(state.memberships.is_empty());
    assert!(state.membership_error.is_some());
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_shell_keeps_selection_across_auth_refresh() {
    let store = MemoryStore::new();
    let provider = Arc::new(LocalIdentityProvider::new(Arc::new(store.clone())));
    let user = provider
        .accounts()
        .create("nissim@example.com", "secret1")
        .await
        .expect("Failed to create account");
    seed_membership(&store, &user.uid).await;
    put(
        &store,
        &DocPath::community("tiferet-moshe-ta").expect("bad id"),
        json!({"name": "Tiferet Moshe Tel Aviv"}),
    )
    .await;
    put(
        &store,
        &DocPath::member("tiferet-moshe-ta", &user.uid).expect("bad path"),
        json!({"roles": ["gabbai"]}),
    )
    .await;

    let mut shell = Shell::new(
        provider.clone(),
        Arc::new(store.clone()),
        &MembershipConfig::default(),
    );
    provider.restore(Some(user.clone()));
    let state = shell.start().await.expect("provider dropped");
    assert_eq!(state.view, View::Dashboard);
    assert_eq!(state.selected_community_id.as_deref(), Some("ahavat-hesed-jlm"));

    shell.dispatch(kolekta::navigation::Action::SelectDashboardCommunity(
        "tiferet-moshe-ta".to_string(),
    ));

    // Same user reported again, e.g. after a token refresh
    provider.restore(Some(user));
    let state = shell.next_event().await.expect("provider dropped");
    assert_eq!(state.view, View::Dashboard);
    assert_eq!(state.selected_community_id.as_deref(), Some("tiferet-moshe-ta"));

    provider.sign_out().await.expect("sign-out failed");
    let state = shell.next_event().await.expect("provider dropped");
    assert_eq!(state.view, View::Directory);
}

async fn slow_store_with_memberships(count: usize, delay: Duration) -> SlowStore {
    let store = MemoryStore::new();
    for i in 0..count {
        let id = format!("c{}", i);
        put(
            &store,
            &DocPath::community(&id).expect("bad id"),
            json!({"name": format!("Community {}", i)}),
        )
        .await;
        put(
            &store,
            &DocPath::member(&id, "u1").expect("bad path"),
            json!({"roles": ["member"]}),
        )
        .await;
    }
    SlowStore {
        inner: store,
        delay,
    }
}

#[tokio::test]
async fn test_probes_overlap_up_to_the_concurrency_limit() {
    let delay = Duration::from_millis(200);
    let config = MembershipConfig {
        max_concurrency: 4,
        ..Default::default()
    };
    let service = MembershipService::new(
        Arc::new(slow_store_with_memberships(4, delay).await),
        &config,
    );

    let started = tokio::time::Instant::now();
    let memberships = service.resolve("u1").await.expect("scan failed");
    let elapsed = started.elapsed();

    assert_eq!(memberships.len(), 4);
    assert!(
        elapsed < Duration::from_millis(600),
        "4 probes at concurrency 4 took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_concurrency_limit_serializes_probes() {
    let delay = Duration::from_millis(200);
    let config = MembershipConfig {
        max_concurrency: 1,
        ..Default::default()
    };
    let service = MembershipService::new(
        Arc::new(slow_store_with_memberships(4, delay).await),
        &config,
    );

    let started = tokio::time::Instant::now();
    let memberships = service.resolve("u1").await.expect("scan failed");
    let elapsed = started.elapsed();

    let ids: Vec<&str> = memberships.iter().map(|m| m.community_id.as_str()).collect();
    assert_eq!(ids, vec!["c0", "c1", "c2", "c3"]);
    assert!(
        elapsed >= Duration::from_millis(800),
        "4 probes at concurrency 1 took only {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_concurrency_limit_bounds_parallel_batches() {
    // Six probes two at a time need three rounds of the delay
    let delay = Duration::from_millis(150);
    let config = MembershipConfig {
        max_concurrency: 2,
        ..Default::default()
    };
    let service = MembershipService::new(
        Arc::new(slow_store_with_memberships(6, delay).await),
        &config,
    );

    let started = tokio::time::Instant::now();
    let memberships = service.resolve("u1").await.expect("scan failed");
    let elapsed = started.elapsed();

    assert_eq!(memberships.len(), 6);
    assert!(elapsed >= Duration::from_millis(450), "took only {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(900), "took {:?}", elapsed);
}
