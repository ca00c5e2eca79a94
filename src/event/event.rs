//! Event value types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::executor::ExecutionError;
use crate::route::{RouteUnit, StatementType};

/// Lifecycle stage of one execute unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Fired immediately before the physical call
    BeforeExecute,
    /// The physical call returned normally
    ExecuteSuccess,
    /// The physical call failed
    ExecuteFailure,
}

impl EventType {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::BeforeExecute => "BEFORE_EXECUTE",
            EventType::ExecuteSuccess => "EXECUTE_SUCCESS",
            EventType::ExecuteFailure => "EXECUTE_FAILURE",
        }
    }

    /// Returns true for success and failure events
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EventType::BeforeExecute)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification describing one unit's execution attempt.
///
/// Terminal events can only be derived from a `BeforeExecute` event, which
/// keeps the id shared and makes `cause` present exactly on failures.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionEvent {
    id: Uuid,
    event_type: EventType,
    statement_type: StatementType,
    data_source_name: String,
    sql: String,
    parameters: Vec<Value>,
    data_source_url: Option<String>,
    #[serde(serialize_with = "serialize_cause")]
    cause: Option<ExecutionError>,
    timestamp: DateTime<Utc>,
}

impl ExecutionEvent {
    /// Create the `BeforeExecute` event for a unit
    pub fn before(
        statement_type: StatementType,
        route_unit: &RouteUnit,
        data_source_url: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: EventType::BeforeExecute,
            statement_type,
            data_source_name: route_unit.data_source_name.clone(),
            sql: route_unit.sql.clone(),
            parameters: route_unit.parameters.clone(),
            data_source_url,
            cause: None,
            timestamp: Utc::now(),
        }
    }

    /// Derive the success event
    pub fn succeeded(&self) -> Self {
        Self {
            event_type: EventType::ExecuteSuccess,
            cause: None,
            timestamp: Utc::now(),
            ..self.clone()
        }
    }

    /// Derive the failure event carrying `cause`
    pub fn failed(&self, cause: ExecutionError) -> Self {
        Self {
            event_type: EventType::ExecuteFailure,
            cause: Some(cause),
            timestamp: Utc::now(),
            ..self.clone()
        }
    }

    /// Id shared by the before and terminal event of one unit
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn statement_type(&self) -> StatementType {
        self.statement_type
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

    /// Connection URL reported by the statement's metadata, if available
    pub fn data_source_url(&self) -> Option<&str> {
        self.data_source_url.as_deref()
    }

    /// Failure cause; present only on `ExecuteFailure`
    pub fn cause(&self) -> Option<&ExecutionError> {
        self.cause.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

fn serialize_cause<S>(cause: &Option<ExecutionError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match cause {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}
