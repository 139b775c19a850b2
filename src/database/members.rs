//! Member rows: registration insert, credential lookup, listing, partial
//! update, and per-member statistics.

use serde::Deserialize;

use super::models::{Member, MemberStats, MemberSummary};
use super::query_builder::{bind_values_as, SetBuilder};
use super::{Database, DatabaseError};

const SUMMARY_COLUMNS: &str = "member_id, name, email, role, join_year, graduation_year, \
     is_active, privilege_level, created_at";

/// Partial update payload: absent fields leave their columns unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub graduation_year: Option<i32>,
    pub is_active: Option<bool>,
    pub privilege_level: Option<String>,
}

impl Database {
    /// Insert a freshly registered member. A duplicate email surfaces as
    /// `UniqueViolation`.
    pub async fn insert_member(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Option<&str>,
        join_year: Option<i32>,
        graduation_year: Option<i32>,
    ) -> Result<MemberSummary, DatabaseError> {
        let sql = format!(
            "INSERT INTO members (name, email, password, role, join_year, graduation_year)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {SUMMARY_COLUMNS}"
        );
        sqlx::query_as::<_, MemberSummary>(&sql)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(role)
            .bind(join_year)
            .bind(graduation_year)
            .fetch_one(self.pool())
            .await
            .map_err(|e| DatabaseError::classify(e, "Email already exists"))
    }

    /// Credential lookup for login. The only query that reads the password
    /// column.
    pub async fn find_member_by_email(&self, email: &str) -> Result<Option<Member>, DatabaseError> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        Ok(member)
    }

    pub async fn list_members(&self) -> Result<Vec<MemberSummary>, DatabaseError> {
        let sql = format!("SELECT {SUMMARY_COLUMNS} FROM members ORDER BY created_at DESC");
        let members = sqlx::query_as::<_, MemberSummary>(&sql)
            .fetch_all(self.pool())
            .await?;
        Ok(members)
    }

    pub async fn get_member(&self, id: i32) -> Result<Option<MemberSummary>, DatabaseError> {
        let sql = format!("SELECT {SUMMARY_COLUMNS} FROM members WHERE member_id = $1");
        let member = sqlx::query_as::<_, MemberSummary>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(member)
    }

    /// Partial update; returns the updated summary, or `None` when the id
    /// does not exist.
    pub async fn update_member(
        &self,
        id: i32,
        update: MemberUpdate,
    ) -> Result<Option<MemberSummary>, DatabaseError> {
        let mut set = SetBuilder::new();
        if let Some(name) = update.name {
            set.set("name", name);
        }
        if let Some(role) = update.role {
            set.set("role", role);
        }
        if let Some(graduation_year) = update.graduation_year {
            set.set("graduation_year", graduation_year);
        }
        if let Some(is_active) = update.is_active {
            set.set("is_active", is_active);
        }
        if let Some(privilege_level) = update.privilege_level {
            set.set("privilege_level", privilege_level);
        }

        if set.is_empty() {
            return self.get_member(id).await;
        }
        set.set_raw("updated_at = NOW()");

        let sql = format!(
            "UPDATE members {} WHERE member_id = ${} RETURNING {SUMMARY_COLUMNS}",
            set.clause(),
            set.next_index()
        );
        let query = bind_values_as(sqlx::query_as::<_, MemberSummary>(&sql), set.params());
        let member = query.bind(id).fetch_optional(self.pool()).await?;
        Ok(member)
    }

    /// Delete a member row; `false` when the id does not exist.
    pub async fn delete_member(&self, id: i32) -> Result<bool, DatabaseError> {
        let deleted =
            sqlx::query_scalar::<_, i32>("DELETE FROM members WHERE member_id = $1 RETURNING member_id")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        Ok(deleted.is_some())
    }

    /// Three independent correlated counts; always a full row of zeroes when
    /// nothing matches.
    pub async fn member_stats(&self, id: i32) -> Result<MemberStats, DatabaseError> {
        let stats = sqlx::query_as::<_, MemberStats>(
            "SELECT
                (SELECT COUNT(*) FROM tasks
                  WHERE assigned_to = $1 AND status = 'completed') AS completed_tasks,
                (SELECT COUNT(*) FROM articles WHERE author_id = $1) AS articles_written,
                (SELECT COUNT(*) FROM robots WHERE team_lead_id = $1) AS robots_led",
        )
        .bind(id)
        .fetch_one(self.pool())
        .await?;
        Ok(stats)
    }
}
