//! Query execution contract.
//!
//! The mapper never talks to a database driver directly. Catalogues issue parameterised
//! `SELECT` statements through a [`QueryExecutor`] and receive [`RawRow`]s: ordered, named,
//! weakly-typed cells. The executor is the only component aware of the physical store.

pub mod sqlite;

pub use sqlite::SqliteExecutor;

use crate::error::DataResult;
use chrono::NaiveDate;
use std::fmt;

/// A weakly-typed cell value as delivered by the store.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(v) => write!(f, "integer {v}"),
            SqlValue::Real(v) => write!(f, "real {v}"),
            SqlValue::Text(v) => write!(f, "text '{v}'"),
            SqlValue::Date(v) => write!(f, "date {v}"),
            SqlValue::Blob(v) => write!(f, "blob of {} bytes", v.len()),
        }
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

/// One row of a query result: cells in column order.
///
/// Column names are matched case-insensitively, as relational stores do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, SqlValue)>,
}

impl RawRow {
    pub fn new(cells: Vec<(String, SqlValue)>) -> Self {
        Self { cells }
    }

    /// Returns the cell for `column`, or `None` if the row has no such column.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.cells
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SqlValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, SqlValue)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Executes read-only, parameterised queries.
///
/// Implementations return rows in the order the store delivers them and an empty `Vec` when
/// nothing matches. They must never be handed DDL or write statements.
pub trait QueryExecutor {
    fn query(&self, sql: &str, params: &[SqlValue]) -> DataResult<Vec<RawRow>>;
}
