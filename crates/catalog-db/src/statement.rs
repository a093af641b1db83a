//! Parameterized statement execution on top of the pool.

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Sqlite, SqlitePool};

use crate::Result;

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(v.into())
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Integer(v as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// Outcome of a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executed {
    pub rows_affected: u64,
    /// Rowid of the last inserted row on this connection.
    pub last_insert_id: i64,
}

pub(crate) fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(None::<i64>),
        SqlValue::Integer(v) => query.bind(*v),
        SqlValue::Real(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
    }
}

fn prepare<'q>(sql: &'q str, params: &[SqlValue]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, value| bind_value(query, value))
}

/// Execute one statement. Each call commits on its own.
pub async fn execute(pool: &SqlitePool, sql: &str, params: &[SqlValue]) -> Result<Executed> {
    let result = prepare(sql, params).execute(pool).await?;
    Ok(Executed {
        rows_affected: result.rows_affected(),
        last_insert_id: result.last_insert_rowid(),
    })
}

/// Execute the same statement once per parameter row.
///
/// Rows are not wrapped in a transaction: a failure leaves earlier rows written.
pub async fn execute_many(pool: &SqlitePool, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
    let mut affected = 0;
    for params in rows {
        affected += prepare(sql, params).execute(pool).await?.rows_affected();
    }
    Ok(affected)
}

/// Fetch at most one row.
pub async fn fetch_one(pool: &SqlitePool, sql: &str, params: &[SqlValue]) -> Result<Option<SqliteRow>> {
    Ok(prepare(sql, params).fetch_optional(pool).await?)
}

/// Fetch every row.
pub async fn fetch_all(pool: &SqlitePool, sql: &str, params: &[SqlValue]) -> Result<Vec<SqliteRow>> {
    Ok(prepare(sql, params).fetch_all(pool).await?)
}
