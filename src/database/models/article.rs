use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::str::FromStr;

/// Article row with the author display name joined in.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Article {
    pub article_id: i32,
    pub title: String,
    pub content: Option<String>,
    pub author_id: Option<i32>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub r#type: String,
    pub category: Option<String>,
    pub competition_year: Option<i32>,
    pub view_count: i32,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleType {
    Tutorial,
    Strategy,
    Documentation,
}

impl FromStr for ArticleType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tutorial" => Ok(ArticleType::Tutorial),
            "strategy" => Ok(ArticleType::Strategy),
            "documentation" => Ok(ArticleType::Documentation),
            _ => Err(()),
        }
    }
}
