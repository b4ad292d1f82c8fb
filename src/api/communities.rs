use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::middleware::{require_auth, CurrentUser};
use crate::models::{Community, CommunityEdit, CommunityEvent};
use crate::services::{filter_communities, CommunityService, DirectoryService};
use crate::utils::title_case_key;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_communities)).route(
        "/:id",
        patch(update_community)
            .route_layer(middleware::from_fn(require_auth))
            .get(get_community),
    )
}

#[derive(Debug, Deserialize)]
pub struct ListCommunitiesQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommunityListResponse {
    pub communities: Vec<CommunitySummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CommunitySummary {
    pub id: String,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct PrayerTimeEntry {
    pub key: String,
    pub label: String,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct CommunityResponse {
    pub id: String,
    pub name: String,
    pub address: String,
    pub contact: String,
    pub prayer_times: Vec<PrayerTimeEntry>,
    pub upcoming_events: Vec<CommunityEvent>,
    pub can_edit: bool,
}

impl CommunityResponse {
    pub fn new(community: Community, can_edit: bool) -> Self {
        let prayer_times = community
            .prayer_times
            .iter()
            .map(|(key, time)| PrayerTimeEntry {
                key: key.clone(),
                label: title_case_key(key),
                time: time.clone(),
            })
            .collect();

        Self {
            name: community.display_name().to_string(),
            id: community.id,
            address: community.address,
            contact: community.contact,
            prayer_times,
            upcoming_events: community.upcoming_events,
            can_edit,
        }
    }
}

async fn list_communities(
    State(state): State<AppState>,
    Query(query): Query<ListCommunitiesQuery>,
) -> Result<Json<CommunityListResponse>> {
    let directory = DirectoryService::new(state.db.store.clone());
    let communities = directory.list().await?;
    let search = query.search.unwrap_or_default();

    let matched: Vec<CommunitySummary> = filter_communities(&communities, &search)
        .into_iter()
        .map(|c| CommunitySummary {
            id: c.id.clone(),
            name: c.display_name().to_string(),
            address: c.address.clone(),
        })
        .collect();

    Ok(Json(CommunityListResponse {
        communities: matched,
        total: communities.len(),
    }))
}

async fn get_community(
    State(state): State<AppState>,
    current_user: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
) -> Result<Json<CommunityResponse>> {
    let viewer = current_user.as_ref().map(|Extension(user)| user.uid.as_str());

    let detail = CommunityService::new(state.db.store.clone())
        .detail(&id, viewer)
        .await?;

    Ok(Json(CommunityResponse::new(detail.community, detail.can_edit)))
}

async fn update_community(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<CommunityEdit>,
) -> Result<Json<CommunityResponse>> {
    let community = CommunityService::new(state.db.store.clone())
        .save(&id, &current_user.uid, payload)
        .await?;

    Ok(Json(CommunityResponse::new(community, true)))
}
