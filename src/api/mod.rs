mod auth;
mod communities;
mod me;
mod navigation;

use axum::{middleware, Router};

use crate::middleware::attach_user;
use crate::AppState;

pub use communities::CommunityResponse;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/communities", communities::routes())
        .nest("/me", me::routes())
        .nest("/navigation", navigation::routes())
        .layer(middleware::from_fn_with_state(state, attach_user))
}
