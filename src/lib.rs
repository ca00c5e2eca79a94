//! shard-executor - parallel statement execution for sharding middleware
//!
//! Runs the physical statements a logical statement was routed to, one per
//! execute unit, and merges the per-shard outcomes into a single logical
//! result. Routing, rewriting and connection acquisition happen upstream;
//! this crate starts from units that already hold a ready statement.
//!
//! # Modules
//!
//! - `route`: route units, execute units, statement types
//! - `statement`: the statement handle seam and row sets
//! - `executor`: execution template, merge policies, statement executor
//! - `event`: lifecycle events and the event bus
//! - `observability`: metrics and tracing listeners
//! - `config`: worker pool and connection-mode settings

pub mod config;
pub mod event;
pub mod executor;
pub mod observability;
pub mod route;
pub mod statement;

pub use config::{ConnectionMode, ExecutorConfig};
pub use event::{EventBus, EventType, ExecutionEvent, ExecutionEventListener};
pub use executor::{
    ExecuteTemplate, ExecutionError, ExecutionMode, ExecutorError, ExecutorResult,
    StatementExecutor, UnitOutcome,
};
pub use route::{ExecuteUnit, RouteUnit, StatementType};
pub use statement::{DataSourceMetadata, RowSet, SqlError, StatementHandle};
