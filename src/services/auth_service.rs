// Auth service - account sign-up/sign-in and API access tokens
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::identity::{AccountStore, AuthUser};
use crate::middleware::{Claims, CurrentUser};
use crate::models::UserProfile;
use crate::services::UserService;
use crate::utils::mask_email;

pub struct AuthService {
    db: Database,
    config: Config,
}

impl AuthService {
    pub fn new(db: Database, config: Config) -> Self {
        Self { db, config }
    }

    fn accounts(&self) -> AccountStore {
        AccountStore::new(Arc::clone(&self.db.store))
    }

    /// Creates the account, then its profile document. A profile write
    /// failure is logged and does not undo the account.
    pub async fn sign_up(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> Result<(UserProfile, String)> {
        if display_name.trim().is_empty() {
            return Err(AppError::BadRequest("Please enter a display name.".to_string()));
        }

        let user = self.accounts().create(email, password).await?;
        let users = UserService::new(Arc::clone(&self.db.store));
        let profile = match users.create_profile(&user, display_name).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(uid = %user.uid, "Error creating user profile: {}", e);
                UserProfile::new(&user.uid, &user.email, display_name)
            }
        };

        let token = self.generate_access_token(&user)?;
        tracing::info!(uid = %user.uid, email = %mask_email(&user.email), "User signed up");

        Ok((profile, token))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(UserProfile, String)> {
        let user = self.accounts().verify(email, password).await.map_err(|e| {
            tracing::info!(email = %mask_email(email), code = e.code(), "Sign-in failed");
            e
        })?;

        let profile = UserService::new(Arc::clone(&self.db.store))
            .profile_or_default(&user)
            .await?;
        let token = self.generate_access_token(&user)?;

        tracing::info!(uid = %user.uid, "User signed in");
        Ok((profile, token))
    }

    pub fn generate_access_token(&self, user: &AuthUser) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.config.jwt.expiry_hours as i64);

        let claims = Claims {
            sub: user.uid.clone(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }

    /// Verifies signature, expiry and revocation.
    pub async fn authenticate_token(&self, token: &str) -> Result<CurrentUser> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?
        .claims;

        if self.db.denylist.is_revoked(&claims.jti).await? {
            return Err(AppError::Unauthorized);
        }

        Ok(CurrentUser {
            uid: claims.sub,
            email: claims.email,
            token_id: claims.jti,
            expires_at: expiry(claims.exp),
        })
    }

    pub async fn invalidate_token(&self, user: &CurrentUser) -> Result<()> {
        self.db
            .denylist
            .revoke(&user.token_id, user.expires_at)
            .await?;
        tracing::info!(uid = %user.uid, "User signed out");
        Ok(())
    }
}

fn expiry(exp: usize) -> DateTime<Utc> {
    Utc.timestamp_opt(exp as i64, 0)
        .single()
        .unwrap_or_else(Utc::now)
}
