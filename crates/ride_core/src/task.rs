//! Cancellable background tasks.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns a spawned task together with the token it listens to.
///
/// Cancelling is idempotent: the first call releases the task, later calls
/// do nothing. Dropping the handle cancels as well, so a forgotten handle
/// cannot leave work running in the background.
#[derive(Debug)]
pub struct TaskHandle {
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Spawn `make(token)` on the current runtime.
    pub fn spawn<F, Fut>(make: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let join = tokio::spawn(make(token.clone()));
        Self {
            token,
            join: Some(join),
        }
    }

    /// Returns `true` only for the call that actually released the task.
    pub fn cancel(&mut self) -> bool {
        self.token.cancel();
        match self.join.take() {
            Some(join) => {
                join.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the task ran to completion or was released.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, JoinHandle::is_finished)
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
