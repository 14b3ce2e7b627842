use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::{
    AccessGroup, CreateGroupInput, GroupDetail, UpdateGroupInput, access::flags,
};
use crate::database::repositories::{AccessFlagRepository, AccessGroupRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::AccessToken;

async fn detail(
    groups: &AccessGroupRepository,
    group: AccessGroup,
) -> Result<GroupDetail, AppError> {
    let group_flags = groups.flags_for(&group.id).await?;
    Ok(GroupDetail::from_parts(group, group_flags))
}

/// GET /api/groups
pub async fn list(
    state: web::Data<AppState>,
    token: AccessToken,
    groups: web::Data<AccessGroupRepository>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::READ_ACCESS_GROUPS)
        .await?;

    let mut payload = Vec::new();
    for group in groups.list().await? {
        payload.push(detail(&groups, group).await?);
    }

    Ok(ApiResponse::success(payload))
}

/// POST /api/groups
pub async fn create(
    state: web::Data<AppState>,
    token: AccessToken,
    groups: web::Data<AccessGroupRepository>,
    input: web::Json<CreateGroupInput>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_ACCESS_GROUPS)
        .await?;

    let mut errors = Vec::new();
    if groups.tag_exists(&input.tag, None).await? {
        errors.push("Tag already taken".to_string());
    }
    if groups.name_exists(&input.name, None).await? {
        errors.push("Name already taken".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let group = groups
        .create(&AccessGroup::new(
            input.tag.clone(),
            input.name.clone(),
            input.description.clone(),
        ))
        .await?;

    Ok(ApiResponse::success(GroupDetail::from_parts(group, vec![])))
}

/// GET /api/groups/{group}
pub async fn get(
    state: web::Data<AppState>,
    token: AccessToken,
    groups: web::Data<AccessGroupRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::READ_ACCESS_GROUPS)
        .await?;

    let group = groups
        .find_by_id(&path)
        .await?
        .ok_or_else(|| AppError::NotFound("Access Group".to_string()))?;

    Ok(ApiResponse::success(detail(&groups, group).await?))
}

/// PUT /api/groups/{group}
pub async fn update(
    state: web::Data<AppState>,
    token: AccessToken,
    groups: web::Data<AccessGroupRepository>,
    path: web::Path<String>,
    input: web::Json<UpdateGroupInput>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_ACCESS_GROUPS)
        .await?;

    let mut group = groups
        .find_by_id(&path)
        .await?
        .ok_or_else(|| AppError::NotFound("Access Group".to_string()))?;

    let mut errors = Vec::new();
    if let Some(tag) = &input.tag {
        if groups.tag_exists(tag, Some(&group.id)).await? {
            errors.push("Tag already taken".to_string());
        }
        group.tag = tag.clone();
    }
    if let Some(name) = &input.name {
        if groups.name_exists(name, Some(&group.id)).await? {
            errors.push("Name already taken".to_string());
        }
        group.name = name.clone();
    }
    if let Some(description) = &input.description {
        group.description = description.clone();
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let updated = groups.update(&group).await?;

    Ok(ApiResponse::success(detail(&groups, updated).await?))
}

/// DELETE /api/groups/{group}
pub async fn delete(
    state: web::Data<AppState>,
    token: AccessToken,
    groups: web::Data<AccessGroupRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_ACCESS_GROUPS)
        .await?;

    groups.delete(&path).await?;

    Ok(ApiResponse::empty())
}

/// PUT /api/groups/{group}/flags/{flag}
pub async fn assign_flag(
    state: web::Data<AppState>,
    token: AccessToken,
    groups: web::Data<AccessGroupRepository>,
    flag_repo: web::Data<AccessFlagRepository>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_ACCESS_GROUPS)
        .await?;

    let (group_id, flag_tag) = path.into_inner();

    let group = groups
        .find_by_id(&group_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid Access Group".to_string()))?;
    let flag = flag_repo
        .find_by_tag(&flag_tag)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid Access Flag".to_string()))?;

    groups.assign_flag(&group.id, &flag.id).await?;

    Ok(ApiResponse::success(detail(&groups, group).await?))
}

/// DELETE /api/groups/{group}/flags/{flag}
pub async fn unassign_flag(
    state: web::Data<AppState>,
    token: AccessToken,
    groups: web::Data<AccessGroupRepository>,
    flag_repo: web::Data<AccessFlagRepository>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .authorize(token.as_str(), flags::WRITE_ACCESS_GROUPS)
        .await?;

    let (group_id, flag_tag) = path.into_inner();

    let group = groups
        .find_by_id(&group_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid Access Group".to_string()))?;
    let flag = flag_repo
        .find_by_tag(&flag_tag)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid Access Flag".to_string()))?;

    groups.unassign_flag(&group.id, &flag.id).await?;

    Ok(ApiResponse::success(detail(&groups, group).await?))
}
