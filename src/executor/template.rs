//! Execution template: runs independent tasks on a shared worker pool
//!
//! - No tasks: returns immediately, the pool is never touched.
//! - One task: runs inline on the calling thread.
//! - More: every task is queued to the pool and the caller blocks until
//!   all of them have reported back.
//!
//! Each task carries its submission index and fills only its own result
//! slot, so results come back in submission order without locking.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use super::errors::{panic_message, ExecutorError, ExecutorResult};
use crate::config::ExecutorConfig;

type Job = Box<dyn FnOnce() + Send + 'static>;

static SHARED: OnceLock<Arc<ExecuteTemplate>> = OnceLock::new();

/// Bounded worker pool shared across execution calls.
///
/// Holds no per-call state. Dropping the template closes the job queue and
/// joins the workers after they drain it.
pub struct ExecuteTemplate {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl ExecuteTemplate {
    /// Build a pool sized by `config`
    pub fn new(config: &ExecutorConfig) -> ExecutorResult<Self> {
        config.validate()?;

        let (sender, receiver) = bounded::<Job>(config.queue_capacity);
        let mut workers = Vec::with_capacity(config.worker_threads);

        for id in 0..config.worker_threads {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("shard-exec-{}", id))
                .spawn(move || worker_loop(receiver))
                .map_err(|e| {
                    ExecutorError::PoolUnavailable(format!("failed to spawn worker {}: {}", id, e))
                })?;
            workers.push(handle);
        }

        tracing::debug!(
            worker_threads = config.worker_threads,
            queue_capacity = config.queue_capacity,
            "execute template started"
        );

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// The process-wide template, built with default configuration on first use
    pub fn shared() -> ExecutorResult<Arc<Self>> {
        if let Some(template) = SHARED.get() {
            return Ok(Arc::clone(template));
        }
        let template = Arc::new(Self::new(&ExecutorConfig::default())?);
        Ok(Arc::clone(SHARED.get_or_init(|| template)))
    }

    /// Number of worker threads in the pool
    pub fn worker_threads(&self) -> usize {
        self.workers.len()
    }

    /// Run `tasks` and return their results in submission order.
    ///
    /// Tasks are expected to report their own failures in `T`. A task that
    /// panics does not kill its worker; the call still waits for every
    /// sibling and then returns `ExecutorError::TaskPanicked`.
    pub fn execute<T, F>(&self, tasks: Vec<F>) -> ExecutorResult<Vec<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let count = tasks.len();
        match count {
            0 => return Ok(Vec::new()),
            1 => {
                let mut tasks = tasks;
                let task = tasks.pop().ok_or(ExecutorError::ResultLost(0))?;
                return run_contained(task)
                    .map(|value| vec![value])
                    .map_err(|message| ExecutorError::TaskPanicked { index: 0, message });
            }
            _ => {}
        }

        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| ExecutorError::PoolUnavailable("template is shut down".to_string()))?;

        let (result_tx, result_rx) = bounded::<(usize, Result<T, String>)>(count);
        for (index, task) in tasks.into_iter().enumerate() {
            let result_tx = result_tx.clone();
            let job: Job = Box::new(move || {
                // Receiver is gone only if the caller already gave up.
                let _ = result_tx.send((index, run_contained(task)));
            });
            sender.send(job).map_err(|_| {
                ExecutorError::PoolUnavailable("worker pool has shut down".to_string())
            })?;
        }
        drop(result_tx);

        let mut slots: Vec<Option<T>> = (0..count).map(|_| None).collect();
        let mut first_panic = None;
        for (index, result) in result_rx.iter() {
            match result {
                Ok(value) => slots[index] = Some(value),
                Err(message) => {
                    tracing::warn!(index, %message, "task panicked on worker");
                    if first_panic.is_none() {
                        first_panic = Some(ExecutorError::TaskPanicked { index, message });
                    }
                }
            }
        }

        if let Some(err) = first_panic {
            return Err(err);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(ExecutorError::ResultLost(index)))
            .collect()
    }
}

impl Drop for ExecuteTemplate {
    fn drop(&mut self) {
        self.sender.take();
        let current = thread::current().id();
        for worker in self.workers.drain(..) {
            if worker.thread().id() != current {
                let _ = worker.join();
            }
        }
    }
}

fn worker_loop(receiver: Receiver<Job>) {
    while let Ok(job) = receiver.recv() {
        job();
    }
}

fn run_contained<T, F>(task: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(task)).map_err(|payload| panic_message(payload.as_ref()))
}
