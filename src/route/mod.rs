//! Route and execute units
//!
//! A route unit pairs a target data source with the final SQL text and its
//! bound parameters. An execute unit binds a route unit to a live statement
//! handle. Both are produced upstream by routing and rewriting; the executor
//! only consumes them.

mod unit;

pub use unit::{ExecuteUnit, RouteUnit, StatementType};
