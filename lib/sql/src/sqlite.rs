use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::error::StoreError;
use crate::traits::{DocStore, Row, Statement, Value};

/// SqliteStore is a DocStore implementation backed by rusqlite (bundled SQLite).
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // Enable WAL mode for better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Convert our Value enum to rusqlite's ToSql.
fn bind_params(params: &[Value]) -> Vec<Box<dyn rusqlite::types::ToSql + '_>> {
    params
        .iter()
        .map(|v| -> Box<dyn rusqlite::types::ToSql + '_> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Real(f) => Box::new(*f),
                Value::Text(s) => Box::new(s.as_str()),
                Value::Blob(b) => Box::new(b.as_slice()),
            }
        })
        .collect()
}

impl DocStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let mut columns = Vec::new();
                for (i, name) in column_names.iter().enumerate() {
                    let val = row_value_at(row, i);
                    columns.push((name.clone(), val));
                }
                Ok(Row { columns })
            })
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(|e| StoreError::Query(e.to_string()))?);
        }
        Ok(result)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Execution(e.to_string()))?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        let affected = conn
            .execute(sql, param_refs.as_slice())
            .map_err(|e| StoreError::Execution(e.to_string()))?;

        Ok(affected as u64)
    }

    fn exec_batch(&self, statements: &[Statement]) -> Result<u64, StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        let mut affected: u64 = 0;
        for stmt in statements {
            let bound = bind_params(&stmt.params);
            let param_refs: Vec<&dyn rusqlite::types::ToSql> =
                bound.iter().map(|b| b.as_ref()).collect();

            let n = tx
                .execute(&stmt.sql, param_refs.as_slice())
                .map_err(|e| StoreError::Execution(e.to_string()))?;
            affected += n as u64;
        }

        tx.commit()
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        Ok(affected)
    }
}

/// Extract a Value from a rusqlite row at a given column index.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> Value {
    // Try integer first, then real, then text, then blob, then null.
    if let Ok(i) = row.get::<_, i64>(idx) {
        return Value::Integer(i);
    }
    if let Ok(f) = row.get::<_, f64>(idx) {
        return Value::Real(f);
    }
    if let Ok(s) = row.get::<_, String>(idx) {
        return Value::Text(s);
    }
    if let Ok(b) = row.get::<_, Vec<u8>>(idx) {
        return Value::Blob(b);
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let s = SqliteStore::open_in_memory().unwrap();
        s.exec(
            "CREATE TABLE t (id TEXT PRIMARY KEY, n INTEGER NOT NULL DEFAULT 0)",
            &[],
        )
        .unwrap();
        s
    }

    #[test]
    fn exec_and_query() {
        let s = store();
        s.exec(
            "INSERT INTO t (id, n) VALUES (?1, ?2)",
            &[Value::Text("a".into()), Value::Integer(7)],
        )
        .unwrap();

        let rows = s
            .query("SELECT id, n FROM t WHERE id = ?1", &[Value::Text("a".into())])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_str("id"), Some("a"));
        assert_eq!(rows[0].get_i64("n"), Some(7));
    }

    #[test]
    fn batch_commits_all_statements() {
        let s = store();
        s.exec_batch(&[
            Statement::new(
                "INSERT INTO t (id, n) VALUES (?1, 0)",
                vec![Value::Text("a".into())],
            ),
            Statement::new(
                "UPDATE t SET n = n + 1 WHERE id = ?1",
                vec![Value::Text("a".into())],
            ),
        ])
        .unwrap();

        let rows = s.query("SELECT n FROM t WHERE id = 'a'", &[]).unwrap();
        assert_eq!(rows[0].get_i64("n"), Some(1));
    }

    #[test]
    fn batch_rolls_back_on_failure() {
        let s = store();
        let result = s.exec_batch(&[
            Statement::new(
                "INSERT INTO t (id, n) VALUES (?1, 0)",
                vec![Value::Text("a".into())],
            ),
            Statement::new("INSERT INTO no_such_table (id) VALUES ('x')", vec![]),
        ]);
        assert!(result.is_err());

        // First insert must not be visible.
        let rows = s.query("SELECT id FROM t", &[]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn null_binding_round_trip() {
        let s = SqliteStore::open_in_memory().unwrap();
        s.exec("CREATE TABLE o (id TEXT PRIMARY KEY, v TEXT)", &[])
            .unwrap();
        s.exec(
            "INSERT INTO o (id, v) VALUES (?1, ?2)",
            &[Value::Text("a".into()), Value::opt_text(None)],
        )
        .unwrap();

        let rows = s.query("SELECT v FROM o WHERE id = 'a'", &[]).unwrap();
        assert!(rows[0].get_str("v").is_none());
    }
}
