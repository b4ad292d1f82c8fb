//! Redis token denylist tests
//!
//! Run: REDIS_URL=redis://... cargo test --test redis_denylist_test -- --ignored

use chrono::{Duration, Utc};
use uuid::Uuid;

use kolekta::services::TokenDenylist;

async fn connect() -> TokenDenylist {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    TokenDenylist::connect_redis(&url)
        .await
        .expect("Failed to connect to Redis")
}

#[tokio::test]
#[ignore = "Requires Redis server"]
async fn test_revoked_token_is_reported() {
    let denylist = connect().await;
    let jti = Uuid::new_v4().to_string();

    assert!(!denylist.is_revoked(&jti).await.expect("lookup failed"));
    denylist
        .revoke(&jti, Utc::now() + Duration::minutes(5))
        .await
        .expect("revoke failed");
    assert!(denylist.is_revoked(&jti).await.expect("lookup failed"));

    let other = Uuid::new_v4().to_string();
    assert!(!denylist.is_revoked(&other).await.expect("lookup failed"));
}

#[tokio::test]
#[ignore = "Requires Redis server"]
async fn test_revocation_expires_with_the_token() {
    let denylist = connect().await;
    let jti = Uuid::new_v4().to_string();

    // Already expired tokens are kept for the one-second minimum ttl
    denylist
        .revoke(&jti, Utc::now() - Duration::seconds(10))
        .await
        .expect("revoke failed");
    tokio::time::sleep(std::time::Duration::from_millis(2_100)).await;

    assert!(!denylist.is_revoked(&jti).await.expect("lookup failed"));
}
