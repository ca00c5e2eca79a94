//! Merge policies
//!
//! One policy per execution mode. A policy names the physical call to make
//! on each statement and reduces the per-unit outcomes into the aggregate.
//! The reductions are pure functions over the outcome list and are exposed
//! on their own so they can be checked without a worker pool.
//!
//! Failed units always stay in the reduction with a mode-specific default:
//! - query: kept as an explicit failed outcome
//! - update: contributes 0
//! - execute: contributes `false`

use std::fmt;

use crate::route::StatementType;
use crate::statement::{RowSet, SqlError, StatementHandle};

use super::outcome::UnitOutcome;

/// Executor entry point a policy serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// `execute_query`
    Query,
    /// `execute_update`
    Update,
    /// `execute`, whatever the statement type
    Execute,
}

impl ExecutionMode {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Query => "query",
            ExecutionMode::Update => "update",
            ExecutionMode::Execute => "execute",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mode-specific physical call plus reduction
pub trait MergePolicy {
    /// Entry point this policy backs
    const MODE: ExecutionMode;

    /// Value produced by one successful unit
    type Value: Send + 'static;
    /// Aggregate returned to the caller
    type Output;

    /// Statement type reported on lifecycle events
    fn statement_type(&self) -> StatementType;

    /// The physical call made for each unit
    fn invoke(statement: &dyn StatementHandle) -> Result<Self::Value, SqlError>;

    /// Reduce the outcomes, one per input unit
    fn merge(&self, outcomes: Vec<UnitOutcome<Self::Value>>) -> Self::Output;
}

/// Query mode: keep every unit's row set
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectRowSets;

impl MergePolicy for CollectRowSets {
    const MODE: ExecutionMode = ExecutionMode::Query;
    type Value = RowSet;
    type Output = Vec<UnitOutcome<RowSet>>;

    fn statement_type(&self) -> StatementType {
        StatementType::Query
    }

    fn invoke(statement: &dyn StatementHandle) -> Result<RowSet, SqlError> {
        statement.execute_query()
    }

    fn merge(&self, outcomes: Vec<UnitOutcome<RowSet>>) -> Self::Output {
        merge_query(outcomes)
    }
}

/// Update mode: sum affected row counts
#[derive(Debug, Clone, Copy, Default)]
pub struct SumUpdateCounts;

impl MergePolicy for SumUpdateCounts {
    const MODE: ExecutionMode = ExecutionMode::Update;
    type Value = u64;
    type Output = u64;

    fn statement_type(&self) -> StatementType {
        StatementType::Update
    }

    fn invoke(statement: &dyn StatementHandle) -> Result<u64, SqlError> {
        statement.execute_update()
    }

    fn merge(&self, outcomes: Vec<UnitOutcome<u64>>) -> u64 {
        merge_update(&outcomes)
    }
}

/// Generic execute: resolve the "first result is a row set" flag
#[derive(Debug, Clone, Copy)]
pub struct ResolveExecuteFlag {
    statement_type: StatementType,
}

impl ResolveExecuteFlag {
    pub fn new(statement_type: StatementType) -> Self {
        Self { statement_type }
    }
}

impl MergePolicy for ResolveExecuteFlag {
    const MODE: ExecutionMode = ExecutionMode::Execute;
    type Value = bool;
    type Output = bool;

    fn statement_type(&self) -> StatementType {
        self.statement_type
    }

    fn invoke(statement: &dyn StatementHandle) -> Result<bool, SqlError> {
        statement.execute()
    }

    fn merge(&self, outcomes: Vec<UnitOutcome<bool>>) -> bool {
        merge_execute(&outcomes, self.statement_type)
    }
}

/// Query reduction: the outcomes themselves, in template order
pub fn merge_query(outcomes: Vec<UnitOutcome<RowSet>>) -> Vec<UnitOutcome<RowSet>> {
    outcomes
}

/// Update reduction: sum of counts, failed units count as 0
pub fn merge_update(outcomes: &[UnitOutcome<u64>]) -> u64 {
    outcomes
        .iter()
        .map(|outcome| outcome.value().copied().unwrap_or(0))
        .fold(0u64, u64::saturating_add)
}

/// Execute reduction.
///
/// For queries, true if any unit reported a row set. For every other
/// statement type the caller never sees a result set, so always false.
pub fn merge_execute(outcomes: &[UnitOutcome<bool>], statement_type: StatementType) -> bool {
    match statement_type {
        StatementType::Query => outcomes
            .iter()
            .any(|outcome| outcome.value().copied().unwrap_or(false)),
        StatementType::Update | StatementType::Generic => false,
    }
}
