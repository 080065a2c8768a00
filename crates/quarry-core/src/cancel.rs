use crate::{error::Error, exec::ExecError};
use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::sync::Notify;

///
/// CancellationToken
///
/// Cloneable signal shared between a caller and an in-flight operation.
/// Once cancelled it stays cancelled.
///

#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Race an executor future against cancellation.
    ///
    /// On cancellation the future is dropped, which aborts the call.
    pub async fn guard<T, F>(&self, operation: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, ExecError>>,
    {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }

        tokio::select! {
            biased;
            () = self.cancelled() => Err(Error::Cancelled),
            result = operation => result.map_err(Error::Execution),
        }
    }
}
