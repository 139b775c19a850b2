//! Robot project archive CRUD with team-lead joins and contribution logging.

use serde::Deserialize;
use sqlx::Row;

use super::contributions::{log_contribution, ContributionType};
use super::models::Robot;
use super::query_builder::{bind_values, bind_values_as, SetBuilder, WhereBuilder};
use super::{Database, DatabaseError};

const ROBOT_SELECT: &str = "SELECT r.*, m.name AS team_lead_name
     FROM robots r
     LEFT JOIN members m ON r.team_lead_id = m.member_id";

#[derive(Debug, Default, Deserialize)]
pub struct RobotFilter {
    pub year: Option<i32>,
    pub search: Option<String>,
}

/// Partial update payload: absent fields leave their columns unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct RobotUpdate {
    pub name: Option<String>,
    pub competition_year: Option<i32>,
    pub team_lead_id: Option<i32>,
    pub specifications: Option<String>,
    pub performance_notes: Option<String>,
    pub final_rank: Option<i32>,
}

impl Database {
    /// List robots, most recent competition year first.
    pub async fn list_robots(&self, filter: &RobotFilter) -> Result<Vec<Robot>, DatabaseError> {
        let mut where_builder = WhereBuilder::new();
        if let Some(year) = filter.year {
            where_builder.eq("r.competition_year", year);
        }
        if let Some(ref search) = filter.search {
            where_builder.search(&["r.name", "r.specifications"], search);
        }

        let sql = format!(
            "{ROBOT_SELECT}{} ORDER BY r.competition_year DESC",
            where_builder.clause()
        );
        let robots = bind_values_as(sqlx::query_as::<_, Robot>(&sql), where_builder.params())
            .fetch_all(self.pool())
            .await?;
        Ok(robots)
    }

    pub async fn get_robot(&self, id: i32) -> Result<Option<Robot>, DatabaseError> {
        let sql = format!("{ROBOT_SELECT} WHERE r.robot_id = $1");
        let robot = sqlx::query_as::<_, Robot>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(robot)
    }

    /// Insert a robot project; when a team lead is set, credit them in the
    /// same transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_robot(
        &self,
        name: &str,
        competition_year: Option<i32>,
        team_lead_id: Option<i32>,
        specifications: Option<&str>,
        performance_notes: Option<&str>,
        final_rank: Option<i32>,
        file_path: Option<&str>,
    ) -> Result<i32, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let robot_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO robots (name, competition_year, team_lead_id, specifications, performance_notes, final_rank, file_path)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING robot_id",
        )
        .bind(name)
        .bind(competition_year)
        .bind(team_lead_id)
        .bind(specifications)
        .bind(performance_notes)
        .bind(final_rank)
        .bind(file_path)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(member_id) = team_lead_id {
            log_contribution(&mut *tx, member_id, ContributionType::RobotProject, robot_id).await?;
        }

        tx.commit().await?;
        Ok(robot_id)
    }

    /// Partial update; returns `None` when the id does not exist.
    pub async fn update_robot(
        &self,
        id: i32,
        update: RobotUpdate,
        new_file_path: Option<&str>,
    ) -> Result<Option<Robot>, DatabaseError> {
        let mut set = SetBuilder::new();
        if let Some(name) = update.name {
            set.set("name", name);
        }
        if let Some(competition_year) = update.competition_year {
            set.set("competition_year", competition_year);
        }
        if let Some(team_lead_id) = update.team_lead_id {
            set.set("team_lead_id", team_lead_id);
        }
        if let Some(specifications) = update.specifications {
            set.set("specifications", specifications);
        }
        if let Some(performance_notes) = update.performance_notes {
            set.set("performance_notes", performance_notes);
        }
        if let Some(final_rank) = update.final_rank {
            set.set("final_rank", final_rank);
        }
        if let Some(file_path) = new_file_path {
            set.set("file_path", file_path);
        }

        if set.is_empty() {
            return self.get_robot(id).await;
        }
        set.set_raw("updated_at = NOW()");

        let sql = format!(
            "UPDATE robots {} WHERE robot_id = ${} RETURNING robot_id",
            set.clause(),
            set.next_index()
        );
        let updated = bind_values(sqlx::query(&sql), set.params())
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        if updated.is_none() {
            return Ok(None);
        }
        self.get_robot(id).await
    }

    /// Delete a robot row, returning the stored attachment path so the
    /// caller can remove the blob after the row is gone. Outer `None` means
    /// the id did not exist.
    pub async fn delete_robot(&self, id: i32) -> Result<Option<Option<String>>, DatabaseError> {
        let row = sqlx::query("DELETE FROM robots WHERE robot_id = $1 RETURNING file_path")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        match row {
            Some(row) => Ok(Some(row.try_get("file_path")?)),
            None => Ok(None),
        }
    }
}
