use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::CommunityResponse;
use crate::authz::{authorize, Permission};
use crate::error::{AppError, Result};
use crate::identity::AuthUser;
use crate::middleware::{require_auth, CurrentUser};
use crate::models::{ResolvedMembership, Role};
use crate::navigation::{reduce, Action, ViewState};
use crate::services::{DashboardService, MembershipService, OtherMembership, UserService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/memberships", get(get_memberships))
        .route("/home", get(get_home))
        .route("/dashboard", get(get_dashboard))
        .route_layer(middleware::from_fn(require_auth))
}

#[derive(Debug, Serialize)]
pub struct MembershipsResponse {
    pub memberships: Vec<ResolvedMembership>,
}

async fn get_memberships(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<MembershipsResponse>> {
    let memberships = MembershipService::new(state.db.store.clone(), &state.config.membership)
        .resolve(&current_user.uid)
        .await?;

    Ok(Json(MembershipsResponse { memberships }))
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub selected: Option<String>,
}

/// Landing view after sign-in: runs the membership scan and folds the
/// outcome into a `ViewState`. A failed scan is reported inside the state,
/// not as an HTTP error.
async fn get_home(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<HomeQuery>,
) -> Result<Json<ViewState>> {
    let initial = ViewState {
        selected_community_id: query.selected,
        user_id: Some(current_user.uid.clone()),
        ..ViewState::default()
    };
    let view_state = reduce(
        initial,
        Action::AuthResolved {
            user_id: Some(current_user.uid.clone()),
        },
    );

    let resolved = MembershipService::new(state.db.store.clone(), &state.config.membership)
        .resolve(&current_user.uid)
        .await;
    let action = match resolved {
        Ok(memberships) => Action::MembershipsResolved(memberships),
        Err(e) => {
            tracing::warn!(uid = %current_user.uid, "Membership scan failed: {}", e);
            Action::MembershipsFailed(e.to_string())
        }
    };

    Ok(Json(reduce(view_state, action)))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub community: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub display_name: String,
    pub community: CommunityResponse,
    pub roles: Vec<Role>,
    pub role_description: String,
    pub other_memberships: Vec<OtherMembership>,
    pub memberships: Vec<ResolvedMembership>,
    pub can_switch: bool,
}

async fn get_dashboard(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>> {
    let memberships = MembershipService::new(state.db.store.clone(), &state.config.membership)
        .resolve(&current_user.uid)
        .await?;

    let selected = match query.community {
        Some(id) => id,
        None => memberships
            .first()
            .map(|m| m.community_id.clone())
            .ok_or_else(|| AppError::NotFound("You are not a member of any community.".to_string()))?,
    };

    let context = DashboardService::new(state.db.store.clone(), &state.config.membership)
        .context(&current_user.uid, &memberships, &selected)
        .await?;

    let profile = UserService::new(state.db.store.clone())
        .profile_or_default(&AuthUser {
            uid: current_user.uid.clone(),
            email: current_user.email.clone(),
        })
        .await?;

    let can_edit = authorize(
        Some(&current_user.uid),
        &context.community,
        Permission::EditCommunity,
    );
    let other_memberships = context.others_for_display();

    Ok(Json(DashboardResponse {
        display_name: profile.display_name,
        community: CommunityResponse::new(context.community, can_edit),
        roles: context.roles,
        role_description: context.role_description,
        other_memberships,
        memberships,
        can_switch: context.can_switch,
    }))
}
