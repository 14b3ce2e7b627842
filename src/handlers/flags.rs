use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::{FlagInfo, access::flags};
use crate::database::repositories::AccessFlagRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::AccessToken;

/// GET /api/flags
pub async fn list(
    state: web::Data<AppState>,
    token: AccessToken,
    flag_repo: web::Data<AccessFlagRepository>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::READ_ACCESS_GROUPS)
        .await?;

    let payload: Vec<FlagInfo> = flag_repo
        .list()
        .await?
        .into_iter()
        .map(FlagInfo::from)
        .collect();

    Ok(ApiResponse::success(payload))
}
