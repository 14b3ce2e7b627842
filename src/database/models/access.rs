use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Access flag tags checked by the route handlers.
pub mod flags {
    pub const USE_HOLIDAY_API: &str = "use_holiday_api";
    pub const USE_EVENT_API: &str = "use_event_api";
    pub const USE_STATISTICS_API: &str = "use_statistics_api";
    pub const READ_SYSTEM_CONFIG: &str = "read_system_config";
    pub const WRITE_SYSTEM_CONFIG: &str = "write_system_config";
    pub const READ_USERS: &str = "read_users";
    pub const WRITE_USERS: &str = "write_users";
    pub const READ_ACCESS_GROUPS: &str = "read_access_groups";
    pub const WRITE_ACCESS_GROUPS: &str = "write_access_groups";
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessFlag {
    pub id: String,
    pub flag: String,
    pub name: String,
    pub description: String,
    pub created_at: NaiveDateTime,
}

impl AccessFlag {
    pub fn new(flag: String, name: String, description: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            flag,
            name,
            description,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessGroup {
    pub id: String,
    pub tag: String,
    pub name: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AccessGroup {
    pub fn new(tag: String, name: String, description: String) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tag,
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Flag payload; the tag is lowercased on the way out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlagInfo {
    pub id: String,
    pub flag: String,
    pub name: String,
    pub description: String,
}

impl From<AccessFlag> for FlagInfo {
    fn from(flag: AccessFlag) -> Self {
        Self {
            id: flag.id,
            flag: flag.flag.to_lowercase(),
            name: flag.name,
            description: flag.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupInfo {
    pub id: String,
    pub tag: String,
    pub name: String,
    pub description: String,
}

impl From<AccessGroup> for GroupInfo {
    fn from(group: AccessGroup) -> Self {
        Self {
            id: group.id,
            tag: group.tag,
            name: group.name,
            description: group.description,
        }
    }
}

/// Group payload with its assigned flags resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDetail {
    pub id: String,
    pub tag: String,
    pub name: String,
    pub description: String,
    pub flags: Vec<FlagInfo>,
}

impl GroupDetail {
    pub fn from_parts(group: AccessGroup, flags: Vec<AccessFlag>) -> Self {
        Self {
            id: group.id,
            tag: group.tag,
            name: group.name,
            description: group.description,
            flags: flags.into_iter().map(FlagInfo::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupInput {
    pub tag: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGroupInput {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}
