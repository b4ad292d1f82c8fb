use axum::{
    extract::State,
    http::HeaderMap,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::identity::AuthUser;
use crate::middleware::{bearer_token, require_auth, CurrentUser};
use crate::models::UserProfile;
use crate::services::{AuthService, UserService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route(
            "/logout",
            post(logout).route_layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/me",
            get(get_current_user).route_layer(middleware::from_fn(require_auth)),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    pub display_name: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub preferred_language: String,
    pub dir: String,
}

impl From<UserProfile> for UserInfo {
    fn from(profile: UserProfile) -> Self {
        Self {
            dir: profile.preferred_language.dir().to_string(),
            preferred_language: profile.preferred_language.as_str().to_string(),
            uid: profile.uid,
            email: profile.email,
            display_name: profile.display_name,
        }
    }
}

async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let auth_service = AuthService::new(state.db.clone(), state.config.clone());
    let (profile, access_token) = auth_service
        .sign_up(&payload.display_name, &payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        access_token,
        user: profile.into(),
    }))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let auth_service = AuthService::new(state.db.clone(), state.config.clone());
    let (profile, access_token) = auth_service
        .sign_in(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        access_token,
        user: profile.into(),
    }))
}

async fn logout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    bearer_token(&headers).ok_or(AppError::Unauthorized)?;

    let auth_service = AuthService::new(state.db.clone(), state.config.clone());
    auth_service.invalidate_token(&current_user).await?;

    Ok(Json(serde_json::json!({ "message": "Logged out successfully" })))
}

async fn get_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>> {
    let user = AuthUser {
        uid: current_user.uid,
        email: current_user.email,
    };
    let profile = UserService::new(state.db.store.clone())
        .profile_or_default(&user)
        .await?;

    Ok(Json(profile.into()))
}
