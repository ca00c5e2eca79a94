//! Executor error types
//!
//! Two families:
//! - `ExecutionError` - a single unit failed. Always absorbed at the unit
//!   boundary and reported through events and outcomes, never raised.
//! - `ExecutorError` - the engine itself could not run the call (worker
//!   pool gone, invalid configuration).

use thiserror::Error;

use crate::statement::SqlError;

/// Failure of one execute unit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The physical statement call returned an error
    #[error("Execution failed on data source '{data_source}': {source}")]
    Statement {
        data_source: String,
        #[source]
        source: SqlError,
    },

    /// The statement handle panicked during the call
    #[error("Statement panicked on data source '{data_source}': {message}")]
    Panicked { data_source: String, message: String },
}

impl ExecutionError {
    /// Create a statement failure
    pub fn statement(data_source: impl Into<String>, source: SqlError) -> Self {
        Self::Statement {
            data_source: data_source.into(),
            source,
        }
    }

    /// Create a panic failure
    pub fn panicked(data_source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Panicked {
            data_source: data_source.into(),
            message: message.into(),
        }
    }

    /// Returns the data source the failure happened on
    pub fn data_source(&self) -> &str {
        match self {
            Self::Statement { data_source, .. } => data_source,
            Self::Panicked { data_source, .. } => data_source,
        }
    }

    /// Returns the driver error, if the failure came from the driver
    pub fn sql_error(&self) -> Option<&SqlError> {
        match self {
            Self::Statement { source, .. } => Some(source),
            Self::Panicked { .. } => None,
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Statement { .. } => "SHARD_EXECUTION_FAILED",
            Self::Panicked { .. } => "SHARD_EXECUTION_PANICKED",
        }
    }
}

/// Engine-level failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The worker pool has shut down or cannot accept work
    #[error("Worker pool unavailable: {0}")]
    PoolUnavailable(String),

    /// A task panicked outside of unit-level containment
    #[error("Task {index} panicked: {message}")]
    TaskPanicked { index: usize, message: String },

    /// A task finished without delivering its result
    #[error("Result of task {0} was lost")]
    ResultLost(usize),

    /// Configuration could not be loaded or failed validation
    #[error("Invalid executor configuration: {0}")]
    Config(String),
}

impl ExecutorError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::PoolUnavailable(_) => "EXECUTOR_POOL_UNAVAILABLE",
            Self::TaskPanicked { .. } => "EXECUTOR_TASK_PANICKED",
            Self::ResultLost(_) => "EXECUTOR_RESULT_LOST",
            Self::Config(_) => "EXECUTOR_CONFIG_INVALID",
        }
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Extracts a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
