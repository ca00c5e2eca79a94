//! Unit value types

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::statement::StatementHandle;

/// Classification of a logical statement.
///
/// Selected once per execution call; every unit of that call runs in the
/// same mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    /// Read-only query (DQL)
    Query,
    /// Data-modifying statement (DML)
    Update,
    /// Anything else; the driver decides whether a result set is produced
    Generic,
}

impl StatementType {
    /// Returns the string representation, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::Query => "query",
            StatementType::Update => "update",
            StatementType::Generic => "generic",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target data source plus the final SQL to run there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteUnit {
    /// Logical name of the physical data source (e.g. `ds_0`)
    pub data_source_name: String,
    /// Rewritten SQL text
    pub sql: String,
    /// Bound parameters in placeholder order
    #[serde(default)]
    pub parameters: Vec<Value>,
}

impl RouteUnit {
    /// Creates a route unit without parameters
    pub fn new(data_source_name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            data_source_name: data_source_name.into(),
            sql: sql.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a route unit with bound parameters
    pub fn with_parameters(
        data_source_name: impl Into<String>,
        sql: impl Into<String>,
        parameters: Vec<Value>,
    ) -> Self {
        Self {
            data_source_name: data_source_name.into(),
            sql: sql.into(),
            parameters,
        }
    }

    pub fn data_source_name(&self) -> &str {
        &self.data_source_name
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }
}

impl fmt::Display for RouteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.data_source_name, self.sql)
    }
}

/// A route unit bound to a ready-to-run statement handle.
///
/// Cloning only clones the handle reference, not the physical statement.
#[derive(Clone)]
pub struct ExecuteUnit {
    route_unit: RouteUnit,
    statement: Arc<dyn StatementHandle>,
}

impl ExecuteUnit {
    /// Binds a route unit to a statement handle
    pub fn new(route_unit: RouteUnit, statement: Arc<dyn StatementHandle>) -> Self {
        Self {
            route_unit,
            statement,
        }
    }

    /// Returns the route unit
    pub fn route_unit(&self) -> &RouteUnit {
        &self.route_unit
    }

    /// Returns the statement handle
    pub fn statement(&self) -> &dyn StatementHandle {
        self.statement.as_ref()
    }

    /// Splits the unit into its parts
    pub fn into_parts(self) -> (RouteUnit, Arc<dyn StatementHandle>) {
        (self.route_unit, self.statement)
    }
}

impl fmt::Debug for ExecuteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteUnit")
            .field("route_unit", &self.route_unit)
            .finish_non_exhaustive()
    }
}
