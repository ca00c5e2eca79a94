//! Shared fixtures for executor integration tests
//!
//! - `MockStatement`: scripted statement handle that counts its calls
//! - `RecordingListener`: collects every posted event

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use shard_executor::{
    DataSourceMetadata, EventBus, ExecuteTemplate, ExecuteUnit, ExecutionEvent,
    ExecutionEventListener, ExecutorConfig, RouteUnit, RowSet, SqlError, StatementExecutor,
    StatementHandle,
};

/// Statement handle returning preconfigured results
pub struct MockStatement {
    url: String,
    rows: Result<RowSet, SqlError>,
    count: Result<u64, SqlError>,
    flag: Result<bool, SqlError>,
    panic_message: Option<String>,
    metadata_panic: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl MockStatement {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            rows: Ok(RowSet::default()),
            count: Ok(0),
            flag: Ok(false),
            panic_message: None,
            metadata_panic: None,
            delay: None,
            calls: AtomicUsize::new(0),
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn rows(mut self, rows: RowSet) -> Self {
        self.rows = Ok(rows);
        self
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = Ok(count);
        self
    }

    pub fn flag(mut self, flag: bool) -> Self {
        self.flag = Ok(flag);
        self
    }

    /// Every physical call fails with `error`
    pub fn failing(mut self, error: SqlError) -> Self {
        self.rows = Err(error.clone());
        self.count = Err(error.clone());
        self.flag = Err(error);
        self
    }

    /// Every physical call panics with `message`
    pub fn panicking(mut self, message: &str) -> Self {
        self.panic_message = Some(message.to_string());
        self
    }

    /// Metadata lookup panics with `message`
    pub fn metadata_panicking(mut self, message: &str) -> Self {
        self.metadata_panic = Some(message.to_string());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Share concurrency gauges with other statements
    pub fn gauged(mut self, active: Arc<AtomicUsize>, peak: Arc<AtomicUsize>) -> Self {
        self.active = active;
        self.peak = peak;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.active.fetch_sub(1, Ordering::SeqCst);
        if let Some(message) = &self.panic_message {
            panic!("{}", message);
        }
    }
}

impl StatementHandle for MockStatement {
    fn execute_query(&self) -> Result<RowSet, SqlError> {
        self.enter();
        self.rows.clone()
    }

    fn execute_update(&self) -> Result<u64, SqlError> {
        self.enter();
        self.count.clone()
    }

    fn execute(&self) -> Result<bool, SqlError> {
        self.enter();
        self.flag.clone()
    }

    fn metadata(&self) -> Result<DataSourceMetadata, SqlError> {
        if let Some(message) = &self.metadata_panic {
            panic!("{}", message);
        }
        Ok(DataSourceMetadata::new(self.url.clone()))
    }
}

/// Listener that keeps every event it sees
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ExecutionEvent>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<ExecutionEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Events for one data source, in posting order
    pub fn events_for(&self, data_source: &str) -> Vec<ExecutionEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.data_source_name() == data_source)
            .collect()
    }
}

impl ExecutionEventListener for RecordingListener {
    fn on_event(&self, event: &ExecutionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Executor with its own pool and bus, plus the listener recording that bus
pub fn executor(workers: usize) -> (StatementExecutor, Arc<RecordingListener>) {
    let template = ExecuteTemplate::new(&ExecutorConfig::with_worker_threads(workers)).unwrap();
    let bus = Arc::new(EventBus::new());
    let listener = Arc::new(RecordingListener::default());
    bus.register(listener.clone());
    (StatementExecutor::new(Arc::new(template), bus), listener)
}

pub fn unit(data_source: &str, sql: &str, statement: Arc<MockStatement>) -> ExecuteUnit {
    ExecuteUnit::new(RouteUnit::new(data_source, sql), statement)
}

pub fn url_for(data_source: &str) -> String {
    format!("jdbc:mock://localhost/{}", data_source)
}

pub fn single_row(value: i64) -> RowSet {
    RowSet::new(
        vec!["order_id".to_string()],
        vec![vec![serde_json::Value::from(value)]],
    )
}
