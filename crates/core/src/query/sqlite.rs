//! SQLite-backed [`QueryExecutor`].

use super::{QueryExecutor, RawRow, SqlValue};
use crate::error::DataResult;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags, ToSql};
use std::path::Path;

/// Executes catalogue queries against one SQLite connection.
///
/// A connection belongs to exactly one mapping run at a time; it is not shared across threads.
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    /// Wrap an already opened connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open the database at `path` read-only.
    pub fn open_read_only(path: &Path) -> DataResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self::new(conn))
    }
}

impl QueryExecutor for SqliteExecutor {
    fn query(&self, sql: &str, params: &[SqlValue]) -> DataResult<Vec<RawRow>> {
        tracing::trace!(sql, params = ?params, "executing query");

        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                let value = match row.get_ref(idx)? {
                    ValueRef::Null => SqlValue::Null,
                    ValueRef::Integer(v) => SqlValue::Integer(v),
                    ValueRef::Real(v) => SqlValue::Real(v),
                    ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
                    ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
                };
                cells.push((name.clone(), value));
            }
            result.push(RawRow::new(cells));
        }

        Ok(result)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            SqlValue::Real(v) => ToSqlOutput::Owned(Value::Real(*v)),
            SqlValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            SqlValue::Date(d) => ToSqlOutput::Owned(Value::Text(d.format("%Y-%m-%d").to_string())),
            SqlValue::Blob(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded() -> SqliteExecutor {
        let conn = Connection::open_in_memory().expect("open in-memory database");
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER, name TEXT, score REAL);
             INSERT INTO t VALUES (2, 'b', 1.5);
             INSERT INTO t VALUES (1, 'a', NULL);
             INSERT INTO t VALUES (3, NULL, 2.0);",
        )
        .expect("seed table");
        SqliteExecutor::new(conn)
    }

    #[test]
    fn returns_rows_in_store_order_with_typed_cells() {
        let rows = seeded().query("SELECT * FROM t", &[]).expect("query");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("id"), Some(&SqlValue::Integer(2)));
        assert_eq!(rows[0].get("name"), Some(&SqlValue::Text("b".into())));
        assert_eq!(rows[0].get("score"), Some(&SqlValue::Real(1.5)));
        assert_eq!(rows[1].get("score"), Some(&SqlValue::Null));
        assert_eq!(rows[2].get("id"), Some(&SqlValue::Integer(3)));
    }

    #[test]
    fn binds_positional_parameters() {
        let rows = seeded()
            .query("SELECT name FROM t WHERE id = ?", &[SqlValue::from(1)])
            .expect("query");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), ["name"]);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let rows = seeded()
            .query("SELECT * FROM t WHERE id = ?", &[SqlValue::from(99)])
            .expect("query");
        assert!(rows.is_empty());
    }

    #[test]
    fn invalid_sql_is_a_recoverable_query_error() {
        let err = seeded()
            .query("SELECT * FROM missing_table", &[])
            .expect_err("should fail");
        assert!(err.is_recoverable());
    }

    #[test]
    fn read_only_executor_reads_file_database() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("onkostar.db");
        {
            let conn = Connection::open(&path).expect("create database");
            conn.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (7);")
                .expect("seed table");
        }

        let executor = SqliteExecutor::open_read_only(&path).expect("open read-only");
        let rows = executor.query("SELECT id FROM t", &[]).expect("query");
        assert_eq!(rows[0].get("id"), Some(&SqlValue::Integer(7)));

        let err = executor
            .query("INSERT INTO t VALUES (8) RETURNING id", &[])
            .expect_err("read-only connection must reject writes");
        assert!(matches!(err, crate::error::DataMapperError::Query(_)));
    }
}
