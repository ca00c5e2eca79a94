//! Executor configuration
//!
//! Loaded from a JSON file or built in code. Every field has a default, so
//! an empty object `{}` is a valid configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::executor::{ExecutorError, ExecutorResult};

/// How physical connections are held relative to result consumption.
///
/// Execution and merge semantics are identical under both modes; only the
/// connection lifecycle collaborator behaves differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    /// One connection per unit, results streamed while connections stay open
    #[default]
    MemoryStrictly,
    /// Connections are capped per data source, results are loaded eagerly
    /// so a connection can be released before the next unit runs
    ConnectionStrictly,
}

impl ConnectionMode {
    /// Pick the mode for a data source given how many units target it.
    pub fn resolve(units_for_data_source: usize, max_connections_size_per_query: usize) -> Self {
        if units_for_data_source > max_connections_size_per_query {
            ConnectionMode::ConnectionStrictly
        } else {
            ConnectionMode::MemoryStrictly
        }
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionMode::MemoryStrictly => "MEMORY_STRICTLY",
            ConnectionMode::ConnectionStrictly => "CONNECTION_STRICTLY",
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for the execution engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Number of worker threads in the shared pool (default: available parallelism)
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Capacity of the pending task queue (default: 1024)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Connections one logical query may open per data source (default: 1)
    #[serde(default = "default_max_connections_size_per_query")]
    pub max_connections_size_per_query: usize,

    /// Connection mode reported to the connection lifecycle layer
    #[serde(default)]
    pub connection_mode: ConnectionMode,
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_max_connections_size_per_query() -> usize {
    1
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            queue_capacity: default_queue_capacity(),
            max_connections_size_per_query: default_max_connections_size_per_query(),
            connection_mode: ConnectionMode::default(),
        }
    }
}

impl ExecutorConfig {
    /// Create a config with a fixed worker count
    pub fn with_worker_threads(worker_threads: usize) -> Self {
        Self {
            worker_threads,
            ..Default::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ExecutorResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ExecutorError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            worker_threads = config.worker_threads,
            connection_mode = %config.connection_mode,
            "executor config loaded"
        );
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ExecutorResult<Self> {
        let config: ExecutorConfig = serde_json::from_str(content)
            .map_err(|e| ExecutorError::config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ExecutorResult<()> {
        if self.worker_threads == 0 {
            return Err(ExecutorError::config("worker_threads must be > 0"));
        }
        if self.queue_capacity == 0 {
            return Err(ExecutorError::config("queue_capacity must be > 0"));
        }
        if self.max_connections_size_per_query == 0 {
            return Err(ExecutorError::config(
                "max_connections_size_per_query must be > 0",
            ));
        }
        Ok(())
    }

    /// Connection mode for a data source targeted by `units` units
    pub fn connection_mode_for(&self, units: usize) -> ConnectionMode {
        match self.connection_mode {
            ConnectionMode::ConnectionStrictly => ConnectionMode::ConnectionStrictly,
            ConnectionMode::MemoryStrictly => {
                ConnectionMode::resolve(units, self.max_connections_size_per_query)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert!(config.worker_threads > 0);
        assert_eq!(config.queue_capacity, 1024);
        assert_eq!(config.max_connections_size_per_query, 1);
        assert_eq!(config.connection_mode, ConnectionMode::MemoryStrictly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ExecutorConfig::from_json("{}").unwrap();
        assert_eq!(config.queue_capacity, 1024);
        assert_eq!(config.connection_mode, ConnectionMode::MemoryStrictly);
    }

    #[test]
    fn test_parse_connection_mode() {
        let config = ExecutorConfig::from_json(
            r#"{"worker_threads": 2, "connection_mode": "connection_strictly"}"#,
        )
        .unwrap();
        assert_eq!(config.worker_threads, 2);
        assert_eq!(config.connection_mode, ConnectionMode::ConnectionStrictly);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = ExecutorConfig::from_json(r#"{"worker_threads": 0}"#).unwrap_err();
        assert_eq!(err.code(), "EXECUTOR_CONFIG_INVALID");
        assert!(err.to_string().contains("worker_threads"));
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        assert!(ExecutorConfig::from_json(r#"{"queue_capacity": 0}"#).is_err());
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = ExecutorConfig::from_json("not json").unwrap_err();
        assert!(err.to_string().contains("Invalid config JSON"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"worker_threads": 3, "max_connections_size_per_query": 2}}"#
        )
        .unwrap();

        let config = ExecutorConfig::load(file.path()).unwrap();
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.max_connections_size_per_query, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExecutorConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_connection_mode_resolve() {
        assert_eq!(ConnectionMode::resolve(1, 1), ConnectionMode::MemoryStrictly);
        assert_eq!(ConnectionMode::resolve(2, 1), ConnectionMode::ConnectionStrictly);
        assert_eq!(ConnectionMode::resolve(4, 4), ConnectionMode::MemoryStrictly);
    }

    #[test]
    fn test_connection_mode_for() {
        let config = ExecutorConfig {
            max_connections_size_per_query: 2,
            ..ExecutorConfig::default()
        };
        assert_eq!(config.connection_mode_for(2), ConnectionMode::MemoryStrictly);
        assert_eq!(config.connection_mode_for(3), ConnectionMode::ConnectionStrictly);

        let forced = ExecutorConfig {
            connection_mode: ConnectionMode::ConnectionStrictly,
            ..ExecutorConfig::default()
        };
        assert_eq!(forced.connection_mode_for(1), ConnectionMode::ConnectionStrictly);
    }
}
