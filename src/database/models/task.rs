use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::str::FromStr;

/// Task row with the assignee/creator display names joined in.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub task_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub assigned_to: Option<i32>,
    pub created_by: Option<i32>,
    pub deadline: Option<NaiveDate>,
    pub priority: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub assigned_to_name: Option<String>,
    pub created_by_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl FromStr for TaskPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!("completed".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn priority_parses_known_values_only() {
        assert_eq!("high".parse::<TaskPriority>(), Ok(TaskPriority::High));
        assert!("urgent".parse::<TaskPriority>().is_err());
    }
}
