//! Cooperative cancellation for wait points

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// Sending half; triggers every `Shutdown` cloned from its channel
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Signal shutdown
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half raced against every wait
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// Create a connected trigger and signal
pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl Shutdown {
    /// A signal that never fires
    pub fn never() -> Self {
        shutdown_channel().1
    }

    /// Check whether shutdown was requested
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown is requested
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Trigger dropped without firing
                std::future::pending::<()>().await;
            }
        }
    }

    /// Sleep, or fail with `Error::Cancelled` if shutdown arrives first
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        self.guard(tokio::time::sleep(duration)).await
    }

    /// Run a future to completion unless shutdown arrives first
    pub async fn guard<F: Future>(&self, future: F) -> Result<F::Output> {
        tokio::select! {
            biased;
            () = self.triggered() => Err(Error::Cancelled),
            output = future => Ok(output),
        }
    }
}
