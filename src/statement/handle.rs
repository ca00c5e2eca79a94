//! Statement handle trait

use serde::{Deserialize, Serialize};

use super::errors::SqlError;
use super::row_set::RowSet;

/// Identifying information about the data source behind a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceMetadata {
    /// Connection URL, without credentials
    pub url: String,
    /// Database product name, if the driver reports it
    pub product_name: Option<String>,
}

impl DataSourceMetadata {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            product_name: None,
        }
    }
}

/// A live, ready-to-run physical statement.
///
/// Implementations wrap a driver statement that already has its SQL and
/// parameters bound. Each call blocks until the backend answers. Handles may
/// be invoked from any worker thread, hence `Send + Sync`.
pub trait StatementHandle: Send + Sync {
    /// Run the statement as a query and materialise its rows
    fn execute_query(&self) -> Result<RowSet, SqlError>;

    /// Run the statement as an update and return the affected row count
    fn execute_update(&self) -> Result<u64, SqlError>;

    /// Run the statement generically.
    ///
    /// Returns `true` when the first result is a row set.
    fn execute(&self) -> Result<bool, SqlError>;

    /// Metadata of the connection this statement belongs to
    fn metadata(&self) -> Result<DataSourceMetadata, SqlError>;
}
