//! Execution counters
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::event::{EventType, ExecutionEvent, ExecutionEventListener};
use crate::executor::ExecutionMode;

/// Counters for executor calls and unit lifecycles.
///
/// Call counters are fed by `StatementExecutor::with_metrics`; unit counters
/// are fed by registering the registry as an event listener.
///
/// Uses Relaxed ordering; counters are read for reporting only.
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    query_calls: AtomicU64,
    update_calls: AtomicU64,
    execute_calls: AtomicU64,
    units_started: AtomicU64,
    units_succeeded: AtomicU64,
    units_failed: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one executor entry-point call
    pub fn record_call(&self, mode: ExecutionMode) {
        let counter = match mode {
            ExecutionMode::Query => &self.query_calls,
            ExecutionMode::Update => &self.update_calls,
            ExecutionMode::Execute => &self.execute_calls,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one lifecycle event
    pub fn record_event(&self, event_type: EventType) {
        let counter = match event_type {
            EventType::BeforeExecute => &self.units_started,
            EventType::ExecuteSuccess => &self.units_succeeded,
            EventType::ExecuteFailure => &self.units_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Units started but not yet finished
    pub fn units_in_flight(&self) -> u64 {
        let snapshot = self.snapshot();
        snapshot
            .units_started
            .saturating_sub(snapshot.units_succeeded + snapshot.units_failed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            query_calls: self.query_calls.load(Ordering::Relaxed),
            update_calls: self.update_calls.load(Ordering::Relaxed),
            execute_calls: self.execute_calls.load(Ordering::Relaxed),
            units_started: self.units_started.load(Ordering::Relaxed),
            units_succeeded: self.units_succeeded.load(Ordering::Relaxed),
            units_failed: self.units_failed.load(Ordering::Relaxed),
        }
    }

    /// Current snapshot as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }
}

impl ExecutionEventListener for ExecutionMetrics {
    fn on_event(&self, event: &ExecutionEvent) {
        self.record_event(event.event_type());
    }
}

/// A point-in-time copy of every counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub query_calls: u64,
    pub update_calls: u64,
    pub execute_calls: u64,
    pub units_started: u64,
    pub units_succeeded: u64,
    pub units_failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventBus;
    use crate::executor::ExecutionError;
    use crate::route::{RouteUnit, StatementType};
    use crate::statement::SqlError;
    use std::sync::Arc;

    #[test]
    fn test_new_registry_has_zero_values() {
        let metrics = ExecutionMetrics::new();
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.query_calls, 0);
        assert_eq!(snapshot.units_started, 0);
        assert_eq!(metrics.units_in_flight(), 0);
    }

    #[test]
    fn test_record_calls() {
        let metrics = ExecutionMetrics::new();
        metrics.record_call(ExecutionMode::Query);
        metrics.record_call(ExecutionMode::Query);
        metrics.record_call(ExecutionMode::Update);
        metrics.record_call(ExecutionMode::Execute);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.query_calls, 2);
        assert_eq!(snapshot.update_calls, 1);
        assert_eq!(snapshot.execute_calls, 1);
    }

    #[test]
    fn test_counts_events_from_bus() {
        let metrics = Arc::new(ExecutionMetrics::new());
        let bus = EventBus::new();
        bus.register(metrics.clone());

        let unit = RouteUnit::new("ds_0", "SELECT 1");
        let first = ExecutionEvent::before(StatementType::Query, &unit, None);
        let second = ExecutionEvent::before(StatementType::Query, &unit, None);
        bus.post(&first);
        bus.post(&second);
        assert_eq!(metrics.units_in_flight(), 2);

        bus.post(&first.succeeded());
        bus.post(&second.failed(ExecutionError::statement("ds_0", SqlError::new("boom"))));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.units_started, 2);
        assert_eq!(snapshot.units_succeeded, 1);
        assert_eq!(snapshot.units_failed, 1);
        assert_eq!(metrics.units_in_flight(), 0);
    }

    #[test]
    fn test_to_json() {
        let metrics = ExecutionMetrics::new();
        metrics.record_call(ExecutionMode::Update);
        metrics.record_event(EventType::ExecuteFailure);

        let json = metrics.to_json();
        assert_eq!(json["update_calls"], 1);
        assert_eq!(json["units_failed"], 1);
    }

    #[test]
    fn test_thread_safety() {
        use std::thread;

        let metrics = Arc::new(ExecutionMetrics::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let metrics = Arc::clone(&metrics);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    metrics.record_event(EventType::BeforeExecute);
                    metrics.record_event(EventType::ExecuteSuccess);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.units_started, 800);
        assert_eq!(snapshot.units_succeeded, 800);
    }
}
