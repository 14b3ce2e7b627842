use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::database::models::access::{AccessFlag, AccessGroup, FlagInfo, GroupInfo};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub group_id: String,
    #[serde(skip_serializing)]
    pub totp_secret: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        group_id: String,
        totp_secret: String,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            first_name,
            last_name,
            group_id,
            totp_secret,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A user together with its group and effective flags (own flags unioned with
/// the group's flags).
#[derive(Debug, Clone)]
pub struct ResolvedUser {
    pub user: User,
    pub group: AccessGroup,
    pub flags: Vec<AccessFlag>,
}

impl ResolvedUser {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f.flag == flag)
    }
}

/// User payload with the historical case normalization: lowercased
/// username/email, capitalized names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub group: GroupInfo,
    pub flags: Vec<FlagInfo>,
}

impl From<ResolvedUser> for UserInfo {
    fn from(resolved: ResolvedUser) -> Self {
        Self {
            id: resolved.user.id,
            username: resolved.user.username.to_lowercase(),
            email: resolved.user.email.to_lowercase(),
            first_name: capitalize(&resolved.user.first_name),
            last_name: capitalize(&resolved.user.last_name),
            group: GroupInfo::from(resolved.group),
            flags: resolved.flags.into_iter().map(FlagInfo::from).collect(),
        }
    }
}

/// Create payload: the user plus the one-time TOTP enrollment QR code.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedUserInfo {
    #[serde(flatten)]
    pub user: UserInfo,
    pub qr: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Id of the access group the user is assigned to.
    pub group: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub group: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginInput {
    /// Username or email address.
    pub login: String,
    pub password: String,
    /// Six-digit TOTP code.
    pub token: String,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
