use axum::{routing::post, Json, Router};
use serde::Deserialize;

use crate::navigation::{reduce, Action, ViewState};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(navigate))
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    #[serde(default)]
    pub state: ViewState,
    pub action: Action,
}

/// Applies one action to a client-held view state.
async fn navigate(Json(payload): Json<NavigateRequest>) -> Json<ViewState> {
    Json(reduce(payload.state, payload.action))
}
