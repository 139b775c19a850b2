//! Append-only contribution log.

use sqlx::PgExecutor;

/// What a contribution row credits a member for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionType {
    Article,
    RobotProject,
    TaskCompleted,
}

impl ContributionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionType::Article => "article",
            ContributionType::RobotProject => "robot_project",
            ContributionType::TaskCompleted => "task_completed",
        }
    }
}

/// Append one contribution row. Takes any executor so callers can run it
/// inside the same transaction as the primary record write.
pub(crate) async fn log_contribution<'e>(
    executor: impl PgExecutor<'e>,
    member_id: i32,
    kind: ContributionType,
    reference_id: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO contributions (member_id, contribution_type, reference_id)
         VALUES ($1, $2, $3)",
    )
    .bind(member_id)
    .bind(kind.as_str())
    .bind(reference_id)
    .execute(executor)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contribution_types_map_to_log_values() {
        assert_eq!(ContributionType::Article.as_str(), "article");
        assert_eq!(ContributionType::RobotProject.as_str(), "robot_project");
        assert_eq!(ContributionType::TaskCompleted.as_str(), "task_completed");
    }
}
