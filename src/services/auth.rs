use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::{LoginInput, ResolvedUser};
use crate::database::repositories::{SettingsRepository, UserRepository};
use crate::error::AppError;
use crate::services::two_factor;

/// Setting key holding the JWT signing secret; the configured secret is the
/// fallback when unset.
pub const TOKEN_SECRET_SETTING: &str = "token:secret";

/// Header carrying the access token on protected routes.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Expiration time (seconds since epoch).
    pub exp: usize,
}

/// A token grant returned on login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    /// Expiry as a millisecond timestamp.
    pub expires: i64,
}

/// Raw access token pulled from the `x-access-token` header. Authorization
/// against a flag happens in the handler, where the user can be loaded.
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for AccessToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|t| !t.is_empty());

        match token {
            Some(token) => ready(Ok(AccessToken(token.to_string()))),
            None => ready(Err(AppError::Unauthorized)),
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    settings: SettingsRepository,
    config: Config,
}

impl AuthService {
    pub fn new(users: UserRepository, settings: SettingsRepository, config: Config) -> Self {
        Self {
            users,
            settings,
            config,
        }
    }

    /// Verifies login, password, and TOTP code, and issues a short-lived
    /// token on success. All failure modes collapse into `Unauthorized`.
    pub async fn authenticate(
        &self,
        input: &LoginInput,
    ) -> Result<(ResolvedUser, AuthGrant), AppError> {
        let user = self
            .users
            .find_by_login(&input.login.to_lowercase())
            .await?
            .ok_or(AppError::Unauthorized)?;

        let password_ok = bcrypt::verify(&input.password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.into()))?;
        if !password_ok {
            return Err(AppError::Unauthorized);
        }

        if !two_factor::verify(&user.totp_secret, &input.token)? {
            return Err(AppError::Unauthorized);
        }

        let expires_at = Utc::now() + Duration::minutes(self.config.token_ttl_minutes);
        let claims = Claims {
            sub: user.id.clone(),
            exp: expires_at.timestamp() as usize,
        };

        let secret = self.token_secret().await?;
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(e.into()))?;

        let resolved = self.users.resolve(user).await?;

        Ok((
            resolved,
            AuthGrant {
                token,
                expires: expires_at.timestamp_millis(),
            },
        ))
    }

    /// Resolves the user behind an access token.
    pub async fn user_by_token(&self, token: &str) -> Result<ResolvedUser, AppError> {
        let secret = self.token_secret().await?;
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::Unauthorized,
        })?;

        let user = self
            .users
            .find_by_id(&token_data.claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        self.users.resolve(user).await.map_err(AppError::from)
    }

    /// Resolves the user behind a token and requires the given access flag.
    pub async fn authorize(&self, token: &str, flag: &str) -> Result<ResolvedUser, AppError> {
        let resolved = self.user_by_token(token).await?;

        if resolved.has_flag(flag) {
            Ok(resolved)
        } else {
            Err(AppError::Unauthorized)
        }
    }

    async fn token_secret(&self) -> Result<String, AppError> {
        let stored = self.settings.get(TOKEN_SECRET_SETTING).await?;
        Ok(stored.unwrap_or_else(|| self.config.jwt_secret.clone()))
    }
}
