use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow};
use rand::Rng;
use serde_json::json;

use crate::database::models::{AccessFlag, AccessGroup, User, access::flags};
use crate::database::repositories::{AccessFlagRepository, AccessGroupRepository, UserRepository};
use crate::services::two_factor;

struct FlagSpec {
    flag: &'static str,
    name: &'static str,
    description: &'static str,
}

struct GroupSpec {
    tag: &'static str,
    name: &'static str,
    description: &'static str,
    flags: &'static [&'static str],
}

const FLAG_SPECS: &[FlagSpec] = &[
    FlagSpec {
        flag: flags::USE_HOLIDAY_API,
        name: "Use the Holiday API",
        description: "Gives the user permission to use the Holiday API",
    },
    FlagSpec {
        flag: flags::USE_EVENT_API,
        name: "Use the Work Event Generation API",
        description: "Gives the user permission to use the Work Event Generation API",
    },
    FlagSpec {
        flag: flags::USE_STATISTICS_API,
        name: "Use the Statistics API",
        description: "Gives the user permission to view the platform statistics",
    },
    FlagSpec {
        flag: flags::READ_SYSTEM_CONFIG,
        name: "View the system configuration",
        description: "Gives the user permission to view the system configuration",
    },
    FlagSpec {
        flag: flags::WRITE_SYSTEM_CONFIG,
        name: "Update the system configuration",
        description: "Gives the user permission to update the system configuration",
    },
    FlagSpec {
        flag: flags::READ_USERS,
        name: "View users",
        description: "Gives the user permission to view all users within the platform",
    },
    FlagSpec {
        flag: flags::WRITE_USERS,
        name: "Create and update users",
        description: "Gives the user permission to create, update, and delete users within the platform",
    },
    FlagSpec {
        flag: flags::READ_ACCESS_GROUPS,
        name: "View access groups",
        description: "Gives the user permission to view access groups",
    },
    FlagSpec {
        flag: flags::WRITE_ACCESS_GROUPS,
        name: "Create, update, and delete access groups",
        description: "Gives the user permission to create, update, and delete access groups",
    },
];

const GROUP_SPECS: &[GroupSpec] = &[
    GroupSpec {
        tag: "user",
        name: "User",
        description: "Gives basic privileges to user",
        flags: &[flags::USE_HOLIDAY_API, flags::USE_EVENT_API, flags::READ_USERS],
    },
    GroupSpec {
        tag: "admin",
        name: "Administrators",
        description: "Gives administrative privileges to user",
        flags: &[
            flags::USE_HOLIDAY_API,
            flags::USE_EVENT_API,
            flags::USE_STATISTICS_API,
            flags::READ_SYSTEM_CONFIG,
            flags::WRITE_SYSTEM_CONFIG,
            flags::READ_USERS,
            flags::WRITE_USERS,
            flags::READ_ACCESS_GROUPS,
            flags::WRITE_ACCESS_GROUPS,
        ],
    },
];

/// Creates the default access flags and groups when missing. Safe to run on
/// every startup.
pub async fn ensure_defaults(
    groups: &AccessGroupRepository,
    flags: &AccessFlagRepository,
) -> Result<()> {
    for spec in FLAG_SPECS {
        if flags.find_by_tag(spec.flag).await?.is_none() {
            log::debug!("Flag {} does not exist, creating", spec.flag);
            flags
                .create(&AccessFlag::new(
                    spec.flag.to_string(),
                    spec.name.to_string(),
                    spec.description.to_string(),
                ))
                .await?;
        }
    }

    for spec in GROUP_SPECS {
        let group = match groups.find_by_tag(spec.tag).await? {
            Some(group) => group,
            None => {
                log::debug!("Access group '{}' does not exist, creating", spec.name);
                groups
                    .create(&AccessGroup::new(
                        spec.tag.to_string(),
                        spec.name.to_string(),
                        spec.description.to_string(),
                    ))
                    .await?
            }
        };

        for flag_tag in spec.flags {
            if let Some(flag) = flags.find_by_tag(flag_tag).await? {
                groups.assign_flag(&group.id, &flag.id).await?;
            }
        }
    }

    Ok(())
}

/// Bootstraps a `root` administrator when the user table is empty, writing the
/// generated credentials and TOTP QR code to `<data_dir>/root.json`.
pub async fn ensure_root_user(
    users: &UserRepository,
    groups: &AccessGroupRepository,
    data_dir: &str,
) -> Result<()> {
    if users.count().await? > 0 {
        return Ok(());
    }

    let admin_group = groups
        .find_by_tag("admin")
        .await?
        .ok_or_else(|| anyhow!("admin group missing; run ensure_defaults first"))?;

    let password = random_password();
    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;
    let enrollment = two_factor::enroll("root")?;

    users
        .create(&User::new(
            "root".to_string(),
            "root@localhost".to_string(),
            password_hash,
            "Root".to_string(),
            "Administrator".to_string(),
            admin_group.id,
            enrollment.secret,
        ))
        .await?;

    fs::create_dir_all(data_dir)?;
    let path = Path::new(data_dir).join("root.json");
    fs::write(
        &path,
        serde_json::to_string_pretty(&json!({
            "username": "root",
            "password": password,
            "qr": enrollment.qr_data_url,
        }))?,
    )?;

    log::warn!(
        "Saved default root user credentials to {} - delete the file as soon as possible",
        path.display()
    );

    Ok(())
}

fn random_password() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
