use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::AppState;
use crate::database::models::{LoginInput, UserInfo};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::{AccessToken, AuthGrant};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserInfo,
    pub auth: AuthGrant,
}

/// GET /api/auth - resolve the user behind an access token.
pub async fn session(
    state: web::Data<AppState>,
    token: AccessToken,
) -> Result<HttpResponse, AppError> {
    let resolved = state.auth_service.user_by_token(token.as_str()).await?;

    Ok(ApiResponse::success(UserInfo::from(resolved)))
}

/// POST /api/auth - authenticate with login, password, and TOTP code.
pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    let (resolved, grant) = state.auth_service.authenticate(&input).await?;

    Ok(ApiResponse::success(LoginResponse {
        user: UserInfo::from(resolved),
        auth: grant,
    }))
}
