//! Event listener that writes lifecycle events to `tracing`

use crate::event::{EventType, ExecutionEvent, ExecutionEventListener};

/// Logs every lifecycle event.
///
/// Before/success at DEBUG, failure at WARN with the cause.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl ExecutionEventListener for TracingListener {
    fn on_event(&self, event: &ExecutionEvent) {
        match event.event_type() {
            EventType::BeforeExecute => tracing::debug!(
                event_id = %event.id(),
                statement_type = %event.statement_type(),
                data_source = event.data_source_name(),
                data_source_url = event.data_source_url().unwrap_or(""),
                sql = event.sql(),
                parameters = event.parameters().len(),
                "before execute"
            ),
            EventType::ExecuteSuccess => tracing::debug!(
                event_id = %event.id(),
                data_source = event.data_source_name(),
                sql = event.sql(),
                "execute success"
            ),
            EventType::ExecuteFailure => tracing::warn!(
                event_id = %event.id(),
                data_source = event.data_source_name(),
                sql = event.sql(),
                code = event.cause().map(|cause| cause.code()).unwrap_or(""),
                error = %event.cause().map(ToString::to_string).unwrap_or_default(),
                "execute failure"
            ),
        }
    }
}
