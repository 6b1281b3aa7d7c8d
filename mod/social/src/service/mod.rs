pub mod directory;
pub mod follows;
pub mod notifications;
pub mod posts;
pub mod reactions;
pub mod replies;
pub mod reposts;
pub mod schema;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use agora_mail::Mailer;
use agora_sql::{DocStore, Value};

/// Social service error type.
#[derive(Debug, Error)]
pub enum SocialError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<SocialError> for agora_core::ServiceError {
    fn from(e: SocialError) -> Self {
        match e {
            SocialError::NotFound(m) => agora_core::ServiceError::NotFound(m),
            SocialError::Conflict(m) => agora_core::ServiceError::Conflict(m),
            SocialError::Validation(m) => agora_core::ServiceError::Validation(m),
            SocialError::Storage(m) => agora_core::ServiceError::Storage(m),
            SocialError::Internal(m) => agora_core::ServiceError::Internal(m),
        }
    }
}

/// Configuration for the social service.
#[derive(Debug, Clone)]
pub struct SocialConfig {
    /// Suggestion count for an empty search term (recent users).
    pub recent_suggestions: usize,
    /// Suggestion count for a non-empty search term.
    pub search_suggestions: usize,
    /// Site name used in notification email subjects.
    pub site_name: String,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            recent_suggestions: 5,
            search_suggestions: 10,
            site_name: "Agora".to_string(),
        }
    }
}

/// The Social service. Holds the document store, the mail channel, and
/// configuration.
pub struct SocialService {
    pub(crate) db: Arc<dyn DocStore>,
    pub(crate) mailer: Arc<dyn Mailer>,
    pub(crate) config: SocialConfig,
}

impl SocialService {
    /// Create a new SocialService, initializing the DB schema.
    pub fn new(
        db: Arc<dyn DocStore>,
        mailer: Arc<dyn Mailer>,
        config: SocialConfig,
    ) -> Result<Arc<Self>, SocialError> {
        schema::init_schema(db.as_ref())?;
        Ok(Arc::new(Self { db, mailer, config }))
    }

    // ── Generic record helpers ──

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), SocialError> {
        let json = serde_json::to_string(record)
            .map_err(|e| SocialError::Internal(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 3;
            cols.push(col);
            placeholders.push(format!("?{}", idx));
            params.push(val.clone());
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            cols.join(", "),
            placeholders.join(", "),
        );

        self.db.exec(&sql, &params).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint") {
                SocialError::Conflict(msg)
            } else {
                SocialError::Storage(msg)
            }
        })?;

        Ok(())
    }

    /// Get a record by id, deserializing the JSON `data` column.
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<T, SocialError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
        let rows = self
            .db
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| SocialError::NotFound(format!("{}/{}", table, id)))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| SocialError::Internal("missing data column".into()))?;
        serde_json::from_str(data).map_err(|e| SocialError::Internal(e.to_string()))
    }

    /// Deserialize the `data` column of every row.
    pub(crate) fn rows_to_records<T: DeserializeOwned>(
        rows: &[agora_sql::Row],
    ) -> Result<Vec<T>, SocialError> {
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| SocialError::Internal("missing data column".into()))?;
            items.push(
                serde_json::from_str(data).map_err(|e| SocialError::Internal(e.to_string()))?,
            );
        }
        Ok(items)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::{Arc, Mutex};

    use agora_mail::{Email, MailError, Mailer, MemoryMailer};
    use agora_sql::{DocStore, Row, SqliteStore, Statement, StoreError, Value};

    use crate::model::{UpsertUser, User};
    use crate::service::{SocialConfig, SocialService};

    /// Service over in-memory SQLite with a recording mailer.
    pub fn test_service() -> (Arc<SocialService>, Arc<MemoryMailer>) {
        let db: Arc<dyn DocStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let mailer = Arc::new(MemoryMailer::new());
        let svc = SocialService::new(
            db,
            Arc::clone(&mailer) as Arc<dyn Mailer>,
            SocialConfig::default(),
        )
        .unwrap();
        (svc, mailer)
    }

    /// Service built over explicit store/mailer doubles.
    pub fn service_with(
        db: Arc<dyn DocStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Arc<SocialService> {
        SocialService::new(db, mailer, SocialConfig::default()).unwrap()
    }

    pub fn seed_user(
        svc: &SocialService,
        uid: &str,
        email: Option<&str>,
        display_name: Option<&str>,
    ) -> User {
        svc.upsert_user(UpsertUser {
            uid: Some(uid.to_string()),
            email: email.map(String::from),
            display_name: display_name.map(String::from),
            first_name: None,
            last_name: None,
            photo_url: None,
            initials: None,
        })
        .unwrap()
    }

    /// Store double that fails the nth notification insert (1-based) and
    /// delegates everything else.
    pub struct FailingStore {
        inner: SqliteStore,
        fail_on: usize,
        seen: Mutex<usize>,
    }

    impl FailingStore {
        pub fn failing_notification_insert(fail_on: usize) -> Self {
            Self {
                inner: SqliteStore::open_in_memory().unwrap(),
                fail_on,
                seen: Mutex::new(0),
            }
        }
    }

    impl DocStore for FailingStore {
        fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
            self.inner.query(sql, params)
        }

        fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
            if sql.contains("INSERT INTO notifications") {
                let mut seen = self.seen.lock().unwrap();
                *seen += 1;
                if *seen == self.fail_on {
                    return Err(StoreError::Execution("injected notification failure".into()));
                }
            }
            self.inner.exec(sql, params)
        }

        fn exec_batch(&self, statements: &[Statement]) -> Result<u64, StoreError> {
            self.inner.exec_batch(statements)
        }
    }

    /// Mailer double that fails for one recipient and records the rest.
    pub struct FailingMailer {
        pub fail_to: String,
        pub inner: MemoryMailer,
    }

    #[async_trait::async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, email: &Email) -> Result<(), MailError> {
            if email.to == self.fail_to {
                return Err(MailError::Send("injected mail failure".into()));
            }
            self.inner.send(email).await
        }
    }
}
