use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::AuthService;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User uid
    pub email: String,
    pub jti: String, // Token id, used for revocation
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub uid: String,
    pub email: String,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Decodes the bearer token, if any, and attaches `CurrentUser`. Missing or
/// invalid tokens leave the request anonymous; `require_auth` rejects those
/// on protected routes.
pub async fn attach_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()).map(str::to_owned) {
        let auth_service = AuthService::new(state.db.clone(), state.config.clone());
        match auth_service.authenticate_token(&token).await {
            Ok(current_user) => {
                request.extensions_mut().insert(current_user);
            }
            Err(AppError::Unauthorized) => tracing::debug!("Ignoring invalid bearer token"),
            Err(e) => tracing::warn!("Token check failed: {}", e),
        }
    }

    next.run(request).await
}

pub async fn require_auth(request: Request, next: Next) -> Result<Response, AppError> {
    if request.extensions().get::<CurrentUser>().is_none() {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
