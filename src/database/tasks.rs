//! Task CRUD with assignee/creator name joins and completion side effects.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::Row;

use super::contributions::{log_contribution, ContributionType};
use super::models::Task;
use super::query_builder::{bind_values, bind_values_as, SetBuilder, WhereBuilder};
use super::{Database, DatabaseError};

const TASK_SELECT: &str = "SELECT t.*, m.name AS assigned_to_name, c.name AS created_by_name
     FROM tasks t
     LEFT JOIN members m ON t.assigned_to = m.member_id
     LEFT JOIN members c ON t.created_by = c.member_id";

#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub assigned_to: Option<i32>,
}

/// Partial update payload: absent fields leave their columns unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<i32>,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<String>,
}

impl Database {
    /// List tasks, soonest deadline first, unassigned rows included via the
    /// left joins.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, DatabaseError> {
        let mut where_builder = WhereBuilder::new();
        if let Some(ref status) = filter.status {
            where_builder.eq("t.status", status.as_str());
        }
        if let Some(assigned_to) = filter.assigned_to {
            where_builder.eq("t.assigned_to", assigned_to);
        }

        let sql = format!(
            "{TASK_SELECT}{} ORDER BY t.deadline ASC",
            where_builder.clause()
        );
        let tasks = bind_values_as(sqlx::query_as::<_, Task>(&sql), where_builder.params())
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    pub async fn get_task(&self, id: i32) -> Result<Option<Task>, DatabaseError> {
        let sql = format!("{TASK_SELECT} WHERE t.task_id = $1");
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    pub async fn insert_task(
        &self,
        title: &str,
        description: Option<&str>,
        assigned_to: Option<i32>,
        created_by: i32,
        deadline: Option<NaiveDate>,
        priority: &str,
    ) -> Result<i32, DatabaseError> {
        let task_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO tasks (title, description, assigned_to, created_by, deadline, priority)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING task_id",
        )
        .bind(title)
        .bind(description)
        .bind(assigned_to)
        .bind(created_by)
        .bind(deadline)
        .bind(priority)
        .fetch_one(self.pool())
        .await?;
        Ok(task_id)
    }

    /// Partial update. Setting status to `completed` also stamps
    /// `completed_at` and, when the updated row has an assignee, appends a
    /// `task_completed` contribution in the same transaction.
    pub async fn update_task(
        &self,
        id: i32,
        update: TaskUpdate,
    ) -> Result<Option<Task>, DatabaseError> {
        let completing = update.status.as_deref() == Some("completed");

        let mut set = SetBuilder::new();
        if let Some(title) = update.title {
            set.set("title", title);
        }
        if let Some(description) = update.description {
            set.set("description", description);
        }
        if let Some(status) = update.status {
            set.set("status", status);
        }
        if let Some(assigned_to) = update.assigned_to {
            set.set("assigned_to", assigned_to);
        }
        if let Some(deadline) = update.deadline {
            set.set_cast("deadline", deadline.to_string(), "date");
        }
        if let Some(priority) = update.priority {
            set.set("priority", priority);
        }
        if completing {
            set.set_raw("completed_at = NOW()");
        }

        let mut tx = self.pool().begin().await?;

        let assignee: Option<Option<i32>> = if set.is_empty() {
            sqlx::query_scalar("SELECT assigned_to FROM tasks WHERE task_id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
        } else {
            let sql = format!(
                "UPDATE tasks {} WHERE task_id = ${} RETURNING assigned_to",
                set.clause(),
                set.next_index()
            );
            let row = bind_values(sqlx::query(&sql), set.params())
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
            match row {
                Some(row) => Some(row.try_get("assigned_to")?),
                None => None,
            }
        };

        let Some(assignee) = assignee else {
            return Ok(None);
        };

        if completing {
            if let Some(member_id) = assignee {
                log_contribution(&mut *tx, member_id, ContributionType::TaskCompleted, id).await?;
            }
        }

        tx.commit().await?;
        self.get_task(id).await
    }

    /// Delete a task row; `false` when the id does not exist.
    pub async fn delete_task(&self, id: i32) -> Result<bool, DatabaseError> {
        let deleted =
            sqlx::query_scalar::<_, i32>("DELETE FROM tasks WHERE task_id = $1 RETURNING task_id")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        Ok(deleted.is_some())
    }
}
