//! Execution engine
//!
//! Takes execute units that routing and rewriting already produced, runs
//! them against their data sources and merges the per-shard outcomes into
//! one logical result.
//!
//! # Execution Flow
//!
//! 1. Caller hands a `Vec<ExecuteUnit>` to one of the three entry points
//! 2. Each unit becomes one task on the execution template
//! 3. Each task posts its before/after events and records its outcome
//! 4. The mode's merge policy reduces the outcomes
//!
//! # Empty input
//!
//! Zero units yield the mode's identity (`[]`, `0`, `false`) without
//! posting events or touching the worker pool.

mod errors;
mod executor;
mod merge;
mod outcome;
mod template;

pub use errors::{ExecutionError, ExecutorError, ExecutorResult};
pub use executor::StatementExecutor;
pub use merge::{
    merge_execute, merge_query, merge_update, CollectRowSets, ExecutionMode, MergePolicy,
    ResolveExecuteFlag, SumUpdateCounts,
};
pub use outcome::UnitOutcome;
pub use template::ExecuteTemplate;
