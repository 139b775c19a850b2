use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full member row, password hash included. Only the login path reads this;
/// everything that leaves the process serializes [`MemberSummary`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub member_id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub join_year: Option<i32>,
    pub graduation_year: Option<i32>,
    pub is_active: bool,
    pub privilege_level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Member row as exposed over the API: no password column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberSummary {
    pub member_id: i32,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub join_year: Option<i32>,
    pub graduation_year: Option<i32>,
    pub is_active: bool,
    pub privilege_level: String,
    pub created_at: DateTime<Utc>,
}

/// Per-member activity counts. Always zeroes, never nulls, when nothing
/// matches.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MemberStats {
    pub completed_tasks: i64,
    pub articles_written: i64,
    pub robots_led: i64,
}
