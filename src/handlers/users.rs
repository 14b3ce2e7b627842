use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::{
    CreateUserInput, CreatedUserInfo, UpdateUserInput, User, UserInfo, access::flags,
};
use crate::database::repositories::{AccessFlagRepository, AccessGroupRepository, UserRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{AccessToken, two_factor};

/// GET /api/users
pub async fn list(
    state: web::Data<AppState>,
    token: AccessToken,
    users: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::READ_USERS)
        .await?;

    let resolved = users.list_resolved().await?;
    let payload: Vec<UserInfo> = resolved.into_iter().map(UserInfo::from).collect();

    Ok(ApiResponse::success(payload))
}

/// POST /api/users
pub async fn create(
    state: web::Data<AppState>,
    token: AccessToken,
    users: web::Data<UserRepository>,
    groups: web::Data<AccessGroupRepository>,
    input: web::Json<CreateUserInput>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_USERS)
        .await?;

    let group = groups
        .find_by_id(&input.group)
        .await?
        .ok_or_else(|| AppError::BadRequest("Access Group not found".to_string()))?;

    if users.username_exists(&input.username, None).await? {
        return Err(AppError::BadRequest("Username already taken".to_string()));
    }
    if users.email_exists(&input.email, None).await? {
        return Err(AppError::BadRequest("Email already used".to_string()));
    }

    let password_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(e.into()))?;
    let enrollment = two_factor::enroll(&input.username)?;

    let user = users
        .create(&User::new(
            input.username.clone(),
            input.email.clone(),
            password_hash,
            input.first_name.clone(),
            input.last_name.clone(),
            group.id,
            enrollment.secret,
        ))
        .await?;

    let resolved = users.resolve(user).await?;

    Ok(ApiResponse::success(CreatedUserInfo {
        user: UserInfo::from(resolved),
        qr: enrollment.qr_data_url,
    }))
}

/// GET /api/users/{user}
pub async fn get(
    state: web::Data<AppState>,
    token: AccessToken,
    users: web::Data<UserRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::READ_USERS)
        .await?;

    let user = users
        .find_by_id(&path)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;
    let resolved = users.resolve(user).await?;

    Ok(ApiResponse::success(UserInfo::from(resolved)))
}

/// PUT /api/users/{user}
pub async fn update(
    state: web::Data<AppState>,
    token: AccessToken,
    users: web::Data<UserRepository>,
    groups: web::Data<AccessGroupRepository>,
    path: web::Path<String>,
    input: web::Json<UpdateUserInput>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_USERS)
        .await?;

    let mut user = users
        .find_by_id(&path)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    if let Some(username) = &input.username {
        if users.username_exists(username, Some(&user.id)).await? {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }
        user.username = username.clone();
    }
    if let Some(email) = &input.email {
        if users.email_exists(email, Some(&user.id)).await? {
            return Err(AppError::BadRequest("Email already used".to_string()));
        }
        user.email = email.clone();
    }
    if let Some(password) = &input.password {
        user.password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(e.into()))?;
    }
    if let Some(first_name) = &input.first_name {
        user.first_name = first_name.clone();
    }
    if let Some(last_name) = &input.last_name {
        user.last_name = last_name.clone();
    }
    if let Some(group_id) = &input.group {
        let group = groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Access Group not found".to_string()))?;
        user.group_id = group.id;
    }

    let updated = users.update(&user).await?;
    let resolved = users.resolve(updated).await?;

    Ok(ApiResponse::success(UserInfo::from(resolved)))
}

/// DELETE /api/users/{user}
pub async fn delete(
    state: web::Data<AppState>,
    token: AccessToken,
    users: web::Data<UserRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_USERS)
        .await?;

    users.delete(&path).await?;

    Ok(ApiResponse::empty())
}

/// PUT /api/users/{user}/flags/{flag}
pub async fn assign_flag(
    state: web::Data<AppState>,
    token: AccessToken,
    users: web::Data<UserRepository>,
    flag_repo: web::Data<AccessFlagRepository>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_USERS)
        .await?;

    let (user_id, flag_tag) = path.into_inner();

    let user = users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid User".to_string()))?;
    let flag = flag_repo
        .find_by_tag(&flag_tag)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid Access Flag".to_string()))?;

    users.assign_flag(&user.id, &flag.id).await?;
    let resolved = users.resolve(user).await?;

    Ok(ApiResponse::success(UserInfo::from(resolved)))
}

/// DELETE /api/users/{user}/flags/{flag}
pub async fn unassign_flag(
    state: web::Data<AppState>,
    token: AccessToken,
    users: web::Data<UserRepository>,
    flag_repo: web::Data<AccessFlagRepository>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_USERS)
        .await?;

    let (user_id, flag_tag) = path.into_inner();

    let user = users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid User".to_string()))?;
    let flag = flag_repo
        .find_by_tag(&flag_tag)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid Access Flag".to_string()))?;

    users.unassign_flag(&user.id, &flag.id).await?;
    let resolved = users.resolve(user).await?;

    Ok(ApiResponse::success(UserInfo::from(resolved)))
}
