//! Observability for the execution engine
//!
//! Provides:
//! - `ExecutionMetrics`: atomic call and unit counters
//! - `TracingListener`: lifecycle events written to `tracing`
//!
//! Both are plain event listeners and never influence execution.
//!
//! # Usage
//!
//! ```ignore
//! let bus = EventBus::global();
//! let metrics = Arc::new(ExecutionMetrics::new());
//! bus.register(metrics.clone());
//! bus.register(Arc::new(TracingListener));
//! ```

mod listener;
mod metrics;

pub use listener::TracingListener;
pub use metrics::{ExecutionMetrics, MetricsSnapshot};
