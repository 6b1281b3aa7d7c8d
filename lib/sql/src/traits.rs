use crate::error::StoreError;

/// A dynamically-typed parameter value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Wrap an optional string, mapping `None` to an explicit `Null`.
    ///
    /// Every record field must bind to a concrete store value — there is
    /// no "absent" parameter.
    pub fn opt_text(s: Option<&str>) -> Value {
        match s {
            Some(s) => Value::Text(s.to_string()),
            None => Value::Null,
        }
    }
}

/// A row returned from a query — column name to value.
#[derive(Debug, Clone)]
pub struct Row {
    pub columns: Vec<(String, Value)>,
}

impl Row {
    /// Get a column value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Get a text column value by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get an integer column value by name.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }
}

/// A single parameterized statement, used for transactional batches.
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// DocStore is the document-record storage boundary.
///
/// Records are stored as a JSON `data` column plus scalar index columns;
/// the store itself only sees SQL. `exec_batch` is the atomic
/// multi-document write primitive: all statements commit or none do.
pub trait DocStore: Send + Sync {
    /// Execute a query and return rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError>;

    /// Execute a statement (INSERT/UPDATE/DELETE) and return affected row count.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError>;

    /// Execute several statements in a single transaction.
    ///
    /// Returns the total affected row count. A failure in any statement
    /// rolls back the whole batch.
    fn exec_batch(&self, statements: &[Statement]) -> Result<u64, StoreError>;
}
