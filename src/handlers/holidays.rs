use actix_web::{HttpResponse, web};
use chrono::{Datelike, Local};
use serde::Deserialize;

use crate::AppState;
use crate::database::models::access::flags;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{AccessToken, HolidayService};

#[derive(Debug, Deserialize)]
pub struct HolidayQuery {
    /// 3-letter country code.
    pub country: Option<String>,
    /// Defaults to the current year.
    pub year: Option<i32>,
}

/// GET /api/holidays?country=&year=
pub async fn lookup(
    state: web::Data<AppState>,
    token: AccessToken,
    holidays: web::Data<HolidayService>,
    query: web::Query<HolidayQuery>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::USE_HOLIDAY_API)
        .await?;

    let country = query.country.as_deref().ok_or_else(|| {
        AppError::Validation(vec![
            "Missing required query parameter 'country'".to_string(),
        ])
    })?;
    let year = query.year.unwrap_or_else(|| Local::now().year());

    let payload = holidays.lookup(country, year).await?;

    Ok(ApiResponse::success(payload))
}
