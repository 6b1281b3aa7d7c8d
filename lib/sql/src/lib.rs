pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::StoreError;
pub use sqlite::SqliteStore;
pub use traits::{DocStore, Row, Statement, Value};
