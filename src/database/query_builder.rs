//! Dynamic WHERE / SET clause construction.
//!
//! List and update operations take a varying subset of optional inputs. The
//! builders here accumulate (column, operator, value) triples and emit the
//! parameterized clause together with the ordered value list, so placeholder
//! indices can never drift from the bound values and no value is ever
//! spliced into SQL text.

use sqlx::postgres::PgArguments;
use sqlx::FromRow;

/// A value destined for a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

/// Conjunctive WHERE clause builder. Each present filter contributes one
/// predicate; predicates are ANDed in insertion order.
#[derive(Default)]
pub struct WhereBuilder {
    conditions: Vec<String>,
    params: Vec<SqlValue>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = $n`
    pub fn eq(&mut self, column: &str, value: impl Into<SqlValue>) {
        self.params.push(value.into());
        self.conditions
            .push(format!("{} = ${}", column, self.params.len()));
    }

    /// Case-insensitive substring match over one or more text columns,
    /// ORed together: `(a ILIKE $n OR b ILIKE $m)`.
    pub fn search(&mut self, columns: &[&str], needle: &str) {
        let pattern = format!("%{}%", needle);
        let mut parts = Vec::with_capacity(columns.len());
        for column in columns {
            self.params.push(SqlValue::Text(pattern.clone()));
            parts.push(format!("{} ILIKE ${}", column, self.params.len()));
        }
        self.conditions.push(format!("({})", parts.join(" OR ")));
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Emit `" WHERE ..."`, or an empty string when no filter is present.
    pub fn clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}

/// Partial-update SET clause builder. Fields absent from the request are
/// simply never added, leaving their columns untouched.
#[derive(Default)]
pub struct SetBuilder {
    assignments: Vec<String>,
    params: Vec<SqlValue>,
}

impl SetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = $n`
    pub fn set(&mut self, column: &str, value: impl Into<SqlValue>) {
        self.params.push(value.into());
        self.assignments
            .push(format!("{} = ${}", column, self.params.len()));
    }

    /// `column = $n::cast` for columns whose type needs an explicit cast
    /// from a text parameter (e.g. DATE).
    pub fn set_cast(&mut self, column: &str, value: impl Into<SqlValue>, cast: &str) {
        self.params.push(value.into());
        self.assignments
            .push(format!("{} = ${}::{}", column, self.params.len(), cast));
    }

    /// A SQL-side assignment with no bound value, e.g. `completed_at = NOW()`.
    pub fn set_raw(&mut self, assignment: &str) {
        self.assignments.push(assignment.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Emit `"SET a = $1, b = $2"`.
    pub fn clause(&self) -> String {
        format!("SET {}", self.assignments.join(", "))
    }

    /// Index of the next placeholder, for the caller's trailing
    /// `WHERE id = $n`.
    pub fn next_index(&self) -> usize {
        self.params.len() + 1
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}

/// Bind an ordered value list onto a `query_as` in one pass.
pub fn bind_values_as<'q, O>(
    mut query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    params: &[SqlValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    for value in params {
        query = match value {
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Bool(b) => query.bind(*b),
        };
    }
    query
}

/// Bind an ordered value list onto a plain `query`.
pub fn bind_values<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    params: &[SqlValue],
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    for value in params {
        query = match value {
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Bool(b) => query.bind(*b),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_where_emits_no_clause() {
        let where_builder = WhereBuilder::new();
        assert!(where_builder.is_empty());
        assert_eq!(where_builder.clause(), "");
        assert!(where_builder.params().is_empty());
    }

    #[test]
    fn predicates_are_conjunctive_and_ordered() {
        let mut where_builder = WhereBuilder::new();
        where_builder.eq("a.type", "tutorial");
        where_builder.eq("a.competition_year", 2025);

        assert_eq!(
            where_builder.clause(),
            " WHERE a.type = $1 AND a.competition_year = $2"
        );
        assert_eq!(
            where_builder.params(),
            &[SqlValue::Text("tutorial".into()), SqlValue::Int(2025)]
        );
    }

    #[test]
    fn search_spans_columns_with_one_param_each() {
        let mut where_builder = WhereBuilder::new();
        where_builder.eq("a.category", "electrical");
        where_builder.search(&["a.title", "a.content"], "wiring");

        assert_eq!(
            where_builder.clause(),
            " WHERE a.category = $1 AND (a.title ILIKE $2 OR a.content ILIKE $3)"
        );
        assert_eq!(
            where_builder.params(),
            &[
                SqlValue::Text("electrical".into()),
                SqlValue::Text("%wiring%".into()),
                SqlValue::Text("%wiring%".into()),
            ]
        );
    }

    #[test]
    fn set_builder_mixes_bound_and_raw_assignments() {
        let mut set = SetBuilder::new();
        set.set("status", "completed");
        set.set_raw("completed_at = NOW()");
        set.set_cast("deadline", "2026-03-01", "date");

        assert_eq!(
            set.clause(),
            "SET status = $1, completed_at = NOW(), deadline = $2::date"
        );
        assert_eq!(set.next_index(), 3);
        assert_eq!(
            set.params(),
            &[
                SqlValue::Text("completed".into()),
                SqlValue::Text("2026-03-01".into()),
            ]
        );
    }

    #[test]
    fn empty_set_builder_reports_empty() {
        let set = SetBuilder::new();
        assert!(set.is_empty());
        assert_eq!(set.next_index(), 1);
    }
}
