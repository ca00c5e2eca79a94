//! Statement executor
//!
//! Drives a batch of execute units through the execution template and
//! merges their outcomes. The three public entry points differ only in the
//! merge policy they pass to the shared orchestration routine.
//!
//! # Per-unit protocol
//!
//! 1. Look up the data source URL for the event
//! 2. Post `BeforeExecute`
//! 3. Make the policy's physical call
//! 4. Post `ExecuteSuccess`, or `ExecuteFailure` with the cause
//! 5. Hand the outcome (value or cause) to the merge step
//!
//! Every call into the statement handle runs under `catch_unwind`. A handle
//! that panics in its metadata lookup fails the unit without the physical
//! call being made. A unit failure never aborts its siblings and is never
//! raised to the caller. The only errors returned come from the template
//! itself.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use uuid::Uuid;

use super::errors::{panic_message, ExecutionError, ExecutorResult};
use super::merge::{CollectRowSets, MergePolicy, ResolveExecuteFlag, SumUpdateCounts};
use super::outcome::UnitOutcome;
use super::template::ExecuteTemplate;
use crate::config::{ConnectionMode, ExecutorConfig};
use crate::event::{EventBus, ExecutionEvent};
use crate::observability::ExecutionMetrics;
use crate::route::{ExecuteUnit, StatementType};
use crate::statement::RowSet;

/// Runs execute units in parallel and merges their outcomes
pub struct StatementExecutor {
    template: Arc<ExecuteTemplate>,
    event_bus: Arc<EventBus>,
    config: ExecutorConfig,
    metrics: Option<Arc<ExecutionMetrics>>,
}

impl StatementExecutor {
    /// Create an executor over an existing template and event bus
    pub fn new(template: Arc<ExecuteTemplate>, event_bus: Arc<EventBus>) -> Self {
        Self {
            template,
            event_bus,
            config: ExecutorConfig::default(),
            metrics: None,
        }
    }

    /// Create an executor with its own worker pool sized by `config`,
    /// posting to the global event bus
    pub fn from_config(config: ExecutorConfig) -> ExecutorResult<Self> {
        let template = Arc::new(ExecuteTemplate::new(&config)?);
        Ok(Self {
            template,
            event_bus: EventBus::global(),
            config,
            metrics: None,
        })
    }

    /// Create an executor over the process-wide template and event bus
    pub fn shared() -> ExecutorResult<Self> {
        Ok(Self::new(ExecuteTemplate::shared()?, EventBus::global()))
    }

    /// Use `config` for connection-mode resolution
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Record call counters into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<ExecutionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// The event bus lifecycle events are posted to
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Run every unit as a query.
    ///
    /// Returns one outcome per unit. Failed units are present as failed
    /// outcomes carrying their cause.
    pub fn execute_query(&self, units: Vec<ExecuteUnit>) -> ExecutorResult<Vec<UnitOutcome<RowSet>>> {
        self.run(&CollectRowSets, units)
    }

    /// Run every unit as an update and return the summed row count.
    ///
    /// Failed units contribute 0.
    pub fn execute_update(&self, units: Vec<ExecuteUnit>) -> ExecutorResult<u64> {
        self.run(&SumUpdateCounts, units)
    }

    /// Run every unit generically.
    ///
    /// For `StatementType::Query` returns true if any unit produced a row
    /// set; for any other type returns false.
    pub fn execute(
        &self,
        units: Vec<ExecuteUnit>,
        statement_type: StatementType,
    ) -> ExecutorResult<bool> {
        self.run(&ResolveExecuteFlag::new(statement_type), units)
    }

    /// Connection mode the given units require under the configured limits.
    ///
    /// Connection-strict as soon as one data source is targeted by more
    /// units than `max_connections_size_per_query` allows.
    pub fn connection_mode_for(&self, units: &[ExecuteUnit]) -> ConnectionMode {
        let mut per_data_source: HashMap<&str, usize> = HashMap::new();
        for unit in units {
            *per_data_source
                .entry(unit.route_unit().data_source_name())
                .or_default() += 1;
        }

        let strict = per_data_source
            .values()
            .any(|&count| self.config.connection_mode_for(count) == ConnectionMode::ConnectionStrictly);
        if strict {
            ConnectionMode::ConnectionStrictly
        } else {
            ConnectionMode::MemoryStrictly
        }
    }

    fn run<P>(&self, policy: &P, units: Vec<ExecuteUnit>) -> ExecutorResult<P::Output>
    where
        P: MergePolicy + 'static,
    {
        let mode = P::MODE;
        let statement_type = policy.statement_type();
        if let Some(metrics) = &self.metrics {
            metrics.record_call(mode);
        }

        if units.is_empty() {
            return Ok(policy.merge(Vec::new()));
        }

        let total = units.len();
        let span = tracing::debug_span!(
            "shard_execute",
            execution_id = tracing::field::Empty,
            mode = %mode,
            statement_type = %statement_type,
            units = total,
            connection_mode = tracing::field::Empty,
        );
        if !span.is_disabled() {
            span.record("execution_id", tracing::field::display(Uuid::new_v4()));
            span.record(
                "connection_mode",
                tracing::field::display(self.connection_mode_for(&units)),
            );
        }
        let _entered = span.enter();

        let tasks: Vec<_> = units
            .into_iter()
            .map(|unit| {
                let event_bus = Arc::clone(&self.event_bus);
                let span = span.clone();
                move || {
                    let _entered = span.enter();
                    execute_unit::<P>(unit, statement_type, &event_bus)
                }
            })
            .collect();

        let outcomes = self.template.execute(tasks)?;

        let failed = outcomes.iter().filter(|outcome| outcome.is_failed()).count();
        if failed > 0 {
            tracing::warn!(failed, total, "shard units failed, aggregate degraded");
        } else {
            tracing::debug!(total, "shard units completed");
        }

        Ok(policy.merge(outcomes))
    }
}

fn execute_unit<P: MergePolicy>(
    unit: ExecuteUnit,
    statement_type: StatementType,
    event_bus: &EventBus,
) -> UnitOutcome<P::Value> {
    let (route_unit, statement) = unit.into_parts();
    let metadata = panic::catch_unwind(AssertUnwindSafe(|| statement.metadata()));
    let (data_source_url, metadata_panic) = match metadata {
        Ok(Ok(metadata)) => (Some(metadata.url), None),
        Ok(Err(_)) => (None, None),
        Err(payload) => (None, Some(panic_message(payload.as_ref()))),
    };

    let before = ExecutionEvent::before(statement_type, &route_unit, data_source_url);
    event_bus.post(&before);

    let cause = match metadata_panic {
        Some(message) => ExecutionError::panicked(route_unit.data_source_name(), message),
        None => match panic::catch_unwind(AssertUnwindSafe(|| P::invoke(statement.as_ref()))) {
            Ok(Ok(value)) => {
                event_bus.post(&before.succeeded());
                return UnitOutcome::succeeded(route_unit, value);
            }
            Ok(Err(sql_error)) => {
                ExecutionError::statement(route_unit.data_source_name(), sql_error)
            }
            Err(payload) => ExecutionError::panicked(
                route_unit.data_source_name(),
                panic_message(payload.as_ref()),
            ),
        },
    };

    tracing::debug!(
        data_source = route_unit.data_source_name(),
        sql = route_unit.sql(),
        error = %cause,
        "shard unit failed"
    );
    event_bus.post(&before.failed(cause.clone()));
    UnitOutcome::failed(route_unit, cause)
}
