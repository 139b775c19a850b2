use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Robot project row with the team-lead display name joined in.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Robot {
    pub robot_id: i32,
    pub name: String,
    pub competition_year: Option<i32>,
    pub team_lead_id: Option<i32>,
    pub specifications: Option<String>,
    pub performance_notes: Option<String>,
    pub final_rank: Option<i32>,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub team_lead_name: Option<String>,
}
