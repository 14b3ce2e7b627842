use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{AccessFlag, AccessGroup};

#[derive(Clone)]
pub struct AccessGroupRepository {
    pool: SqlitePool,
}

impl AccessGroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, group: &AccessGroup) -> Result<AccessGroup> {
        let created = sqlx::query_as::<_, AccessGroup>(
            r#"
            INSERT INTO access_groups (id, tag, name, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, tag, name, description, created_at, updated_at
            "#,
        )
        .bind(&group.id)
        .bind(&group.tag)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.created_at)
        .bind(group.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<AccessGroup>> {
        let group = sqlx::query_as::<_, AccessGroup>("SELECT * FROM access_groups WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    pub async fn find_by_tag(&self, tag: &str) -> Result<Option<AccessGroup>> {
        let group = sqlx::query_as::<_, AccessGroup>("SELECT * FROM access_groups WHERE tag = ?")
            .bind(tag)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    pub async fn list(&self) -> Result<Vec<AccessGroup>> {
        let groups = sqlx::query_as::<_, AccessGroup>("SELECT * FROM access_groups ORDER BY tag")
            .fetch_all(&self.pool)
            .await?;

        Ok(groups)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM access_groups")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn tag_exists(&self, tag: &str, exclude_id: Option<&str>) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM access_groups WHERE tag = ? AND id != ?")
                .bind(tag)
                .bind(exclude_id.unwrap_or(""))
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn name_exists(&self, name: &str, exclude_id: Option<&str>) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM access_groups WHERE name = ? AND id != ?")
                .bind(name)
                .bind(exclude_id.unwrap_or(""))
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn update(&self, group: &AccessGroup) -> Result<AccessGroup> {
        let updated = sqlx::query_as::<_, AccessGroup>(
            r#"
            UPDATE access_groups
            SET tag = ?, name = ?, description = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, tag, name, description, created_at, updated_at
            "#,
        )
        .bind(&group.tag)
        .bind(&group.name)
        .bind(&group.description)
        .bind(Utc::now().naive_utc())
        .bind(&group.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM access_groups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn flags_for(&self, group_id: &str) -> Result<Vec<AccessFlag>> {
        let flags = sqlx::query_as::<_, AccessFlag>(
            r#"
            SELECT * FROM access_flags
            WHERE id IN (SELECT flag_id FROM group_flags WHERE group_id = ?)
            ORDER BY flag
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(flags)
    }

    pub async fn assign_flag(&self, group_id: &str, flag_id: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO group_flags (group_id, flag_id) VALUES (?, ?)")
            .bind(group_id)
            .bind(flag_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn unassign_flag(&self, group_id: &str, flag_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM group_flags WHERE group_id = ? AND flag_id = ?")
            .bind(group_id)
            .bind(flag_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct AccessFlagRepository {
    pool: SqlitePool,
}

impl AccessFlagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, flag: &AccessFlag) -> Result<AccessFlag> {
        let created = sqlx::query_as::<_, AccessFlag>(
            r#"
            INSERT INTO access_flags (id, flag, name, description, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, flag, name, description, created_at
            "#,
        )
        .bind(&flag.id)
        .bind(&flag.flag)
        .bind(&flag.name)
        .bind(&flag.description)
        .bind(flag.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_tag(&self, flag: &str) -> Result<Option<AccessFlag>> {
        let row = sqlx::query_as::<_, AccessFlag>("SELECT * FROM access_flags WHERE flag = ?")
            .bind(flag)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn list(&self) -> Result<Vec<AccessFlag>> {
        let flags = sqlx::query_as::<_, AccessFlag>("SELECT * FROM access_flags ORDER BY flag")
            .fetch_all(&self.pool)
            .await?;

        Ok(flags)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM access_flags")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
