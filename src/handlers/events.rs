use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::access::flags;
use crate::error::AppError;
use crate::events::{self, GenerateEventsInput};
use crate::handlers::shared::ApiResponse;
use crate::services::AccessToken;

/// POST /api/events - run the work-event generator over the request body.
pub async fn generate(
    state: web::Data<AppState>,
    token: AccessToken,
    input: web::Json<GenerateEventsInput>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::USE_EVENT_API)
        .await?;

    let calendar = events::generate(&input).map_err(|e| AppError::Validation(e.errors))?;

    Ok(ApiResponse::success(calendar))
}
