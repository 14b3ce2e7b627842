use std::collections::{HashMap, HashSet};

use anyhow::{Result, anyhow};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{AccessFlag, AccessGroup, ResolvedUser, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> Result<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, first_name, last_name, group_id, totp_secret, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, username, email, password_hash, first_name, last_name, group_id, totp_secret, created_at, updated_at
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.group_id)
        .bind(&user.totp_secret)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Looks a user up by username or email address.
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ? OR email = ?")
            .bind(login)
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn username_exists(&self, username: &str, exclude_id: Option<&str>) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? AND id != ?")
                .bind(username)
                .bind(exclude_id.unwrap_or(""))
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn email_exists(&self, email: &str, exclude_id: Option<&str>) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND id != ?")
                .bind(email)
                .bind(exclude_id.unwrap_or(""))
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn update(&self, user: &User) -> Result<User> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = ?, email = ?, password_hash = ?, first_name = ?, last_name = ?, group_id = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, username, email, password_hash, first_name, last_name, group_id, totp_secret, created_at, updated_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.group_id)
        .bind(Utc::now().naive_utc())
        .bind(&user.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn assign_flag(&self, user_id: &str, flag_id: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO user_flags (user_id, flag_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(flag_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn unassign_flag(&self, user_id: &str, flag_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM user_flags WHERE user_id = ? AND flag_id = ?")
            .bind(user_id)
            .bind(flag_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Resolves a user's group and effective flags (own flags unioned with the
    /// group's flags).
    pub async fn resolve(&self, user: User) -> Result<ResolvedUser> {
        let group = sqlx::query_as::<_, AccessGroup>("SELECT * FROM access_groups WHERE id = ?")
            .bind(&user.group_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| anyhow!("Access group {} not found for user {}", user.group_id, user.id))?;

        let flags = sqlx::query_as::<_, AccessFlag>(
            r#"
            SELECT * FROM access_flags
            WHERE id IN (
                SELECT flag_id FROM user_flags WHERE user_id = ?
                UNION
                SELECT flag_id FROM group_flags WHERE group_id = ?
            )
            ORDER BY flag
            "#,
        )
        .bind(&user.id)
        .bind(&group.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ResolvedUser { user, group, flags })
    }

    /// Lists every user with group and effective flags resolved. Loads the
    /// access tables once and assembles in memory instead of resolving row by
    /// row.
    pub async fn list_resolved(&self) -> Result<Vec<ResolvedUser>> {
        let users = self.list().await?;
        let groups = sqlx::query_as::<_, AccessGroup>("SELECT * FROM access_groups")
            .fetch_all(&self.pool)
            .await?;
        let flags = sqlx::query_as::<_, AccessFlag>("SELECT * FROM access_flags ORDER BY flag")
            .fetch_all(&self.pool)
            .await?;
        let user_flags: Vec<(String, String)> =
            sqlx::query_as("SELECT user_id, flag_id FROM user_flags")
                .fetch_all(&self.pool)
                .await?;
        let group_flags: Vec<(String, String)> =
            sqlx::query_as("SELECT group_id, flag_id FROM group_flags")
                .fetch_all(&self.pool)
                .await?;

        let groups_by_id: HashMap<&str, &AccessGroup> =
            groups.iter().map(|g| (g.id.as_str(), g)).collect();
        let flags_by_id: HashMap<&str, &AccessFlag> =
            flags.iter().map(|f| (f.id.as_str(), f)).collect();

        users
            .into_iter()
            .map(|user| {
                let group = groups_by_id
                    .get(user.group_id.as_str())
                    .copied()
                    .cloned()
                    .ok_or_else(|| {
                        anyhow!("Access group {} not found for user {}", user.group_id, user.id)
                    })?;

                let mut flag_ids: HashSet<&str> = user_flags
                    .iter()
                    .filter(|(user_id, _)| user_id == &user.id)
                    .map(|(_, flag_id)| flag_id.as_str())
                    .collect();
                flag_ids.extend(
                    group_flags
                        .iter()
                        .filter(|(group_id, _)| group_id == &group.id)
                        .map(|(_, flag_id)| flag_id.as_str()),
                );

                let mut user_flag_rows: Vec<AccessFlag> = flag_ids
                    .into_iter()
                    .filter_map(|id| flags_by_id.get(id).copied().cloned())
                    .collect();
                user_flag_rows.sort_by(|a, b| a.flag.cmp(&b.flag));

                Ok(ResolvedUser {
                    user,
                    group,
                    flags: user_flag_rows,
                })
            })
            .collect()
    }
}
