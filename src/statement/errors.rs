//! Driver error type

use thiserror::Error;

/// Error surfaced by a physical statement call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (sql_state: {}, vendor_code: {vendor_code})", .sql_state.as_deref().unwrap_or("none"))]
pub struct SqlError {
    /// Five character SQLSTATE, when the driver reports one
    pub sql_state: Option<String>,
    /// Vendor specific error code
    pub vendor_code: i32,
    /// Human-readable message
    pub message: String,
}

impl SqlError {
    /// Create an error carrying only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            sql_state: None,
            vendor_code: 0,
            message: message.into(),
        }
    }

    /// Create an error with SQLSTATE and vendor code
    pub fn with_state(
        sql_state: impl Into<String>,
        vendor_code: i32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sql_state: Some(sql_state.into()),
            vendor_code,
            message: message.into(),
        }
    }

    /// Returns the SQLSTATE if present
    pub fn sql_state(&self) -> Option<&str> {
        self.sql_state.as_deref()
    }
}
