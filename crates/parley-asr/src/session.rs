//! The call-session collaborator.

use crate::component::{ComponentHandle, Operation};
use crate::error::AsrError;
use async_trait::async_trait;
use parley_types::CompletionEvent;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;

/// Work deferred with [`Session::schedule_after`].
pub type Deferred = Box<dyn FnOnce() + Send + 'static>;

/// A live call on which components can be run.
///
/// Implemented by the telephony transport. The engine never establishes or
/// tears down calls itself.
#[async_trait]
pub trait Session: Send + Sync {
    /// Whether new operations can still be submitted.
    fn is_alive(&self) -> bool;

    /// Submits an operation and returns once the transport has accepted it.
    async fn write_and_await(&self, operation: Operation) -> Result<ComponentHandle, AsrError>;

    /// Submits an operation and waits for its terminal event.
    async fn submit_and_await(&self, operation: Operation) -> Result<CompletionEvent, AsrError> {
        let handle = self.write_and_await(operation).await?;
        Ok(handle.wait().await)
    }

    /// Runs `task` after `delay`, unless the session has been torn down first.
    fn schedule_after(&self, delay: Duration, task: Deferred);
}

/// Background tasks bound to one session's lifetime.
///
/// Dropping the scope aborts everything still pending.
#[derive(Default)]
pub struct TaskScope {
    tasks: Mutex<JoinSet<()>>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while tasks.try_join_next().is_some() {}
        tasks.spawn(future);
    }

    pub fn spawn_after(&self, delay: Duration, task: Deferred) {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }

    /// Number of tasks not yet reaped.
    pub fn len(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Aborts every pending task.
    pub fn shutdown(&self) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
    }
}
