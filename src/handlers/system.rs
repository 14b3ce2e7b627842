use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::AppState;
use crate::database::models::access::flags;
use crate::database::repositories::{
    AccessFlagRepository, AccessGroupRepository, SettingsRepository, UserRepository,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::AccessToken;

#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    /// Comma-separated setting keys; absent means all settings.
    pub settings: Option<String>,
}

fn split_keys(raw: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for key in raw.split(',').filter(|s| !s.is_empty()) {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// GET /api/system
pub async fn get_settings(
    state: web::Data<AppState>,
    token: AccessToken,
    settings: web::Data<SettingsRepository>,
    query: web::Query<SettingsQuery>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::READ_SYSTEM_CONFIG)
        .await?;

    let payload = match &query.settings {
        Some(raw) => settings.get_many(&split_keys(raw)).await?,
        None => settings.all().await?,
    };

    Ok(ApiResponse::success(payload))
}

/// PUT /api/system - upsert every entry in the request body.
pub async fn put_settings(
    state: web::Data<AppState>,
    token: AccessToken,
    settings: web::Data<SettingsRepository>,
    body: web::Json<serde_json::Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_SYSTEM_CONFIG)
        .await?;

    // Validate every value before writing anything.
    for value in body.values() {
        if stringify(value).is_none() {
            return Err(AppError::BadRequest(
                "Invalid value type: Only string, boolean, and number are allowed".to_string(),
            ));
        }
    }

    let mut written = BTreeMap::new();
    for (key, value) in body.iter() {
        if let Some(stored) = stringify(value) {
            settings.set(key, &stored).await?;
            written.insert(key.clone(), stored);
        }
    }

    Ok(ApiResponse::success(written))
}

/// PUT /api/system/{setting}/{value} - upsert a single setting.
pub async fn put_setting(
    state: web::Data<AppState>,
    token: AccessToken,
    settings: web::Data<SettingsRepository>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_SYSTEM_CONFIG)
        .await?;

    let (setting, value) = path.into_inner();
    settings.set(&setting, &value).await?;

    let mut payload = BTreeMap::new();
    payload.insert(setting, value);

    Ok(ApiResponse::success(payload))
}

/// DELETE /api/system?settings=a,b
pub async fn delete_settings(
    state: web::Data<AppState>,
    token: AccessToken,
    settings: web::Data<SettingsRepository>,
    query: web::Query<SettingsQuery>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_SYSTEM_CONFIG)
        .await?;

    for key in split_keys(query.settings.as_deref().unwrap_or_default()) {
        settings.delete(&key).await?;
    }

    Ok(ApiResponse::empty())
}

/// GET /api/statistics - platform overview panels.
pub async fn statistics(
    state: web::Data<AppState>,
    token: AccessToken,
    pool: web::Data<SqlitePool>,
    users: web::Data<UserRepository>,
    groups: web::Data<AccessGroupRepository>,
    flag_repo: web::Data<AccessFlagRepository>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::USE_STATISTICS_API)
        .await?;

    let now = Local::now();
    let database_version: String = sqlx::query_scalar("SELECT sqlite_version()")
        .fetch_one(pool.get_ref())
        .await?;
    let num_users = users.count().await?;
    let num_groups = groups.count().await?;
    let num_flags = flag_repo.count().await?;

    let payload = json!([
        [
            {
                "id": "server_date",
                "name": "Current server date",
                "value": now.format("%d/%m/%Y").to_string(),
            },
            {
                "id": "server_time",
                "name": "Current server time",
                "value": now.format("%H:%M").to_string(),
            },
        ],
        [
            {
                "id": "database_status",
                "name": "Database status",
                "value": if pool.is_closed() { "Disconnected" } else { "Connected" },
            },
            {
                "id": "database_version",
                "name": "SQLite version",
                "value": database_version,
            },
        ],
        [
            {
                "id": "num_users",
                "name": "Registered users",
                "value": num_users,
            },
            {
                "id": "num_groups",
                "name": "Access groups",
                "value": num_groups,
            },
            {
                "id": "num_flags",
                "name": "Access flags",
                "value": num_flags,
            },
        ],
    ]);

    Ok(ApiResponse::success(payload))
}

/// Stored representation of a configuration value; structured values are
/// rejected.
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
