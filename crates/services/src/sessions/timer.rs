//! Cancellable periodic tick source for timed sessions.
//!
//! The ticker never touches the session. It only sends [`Tick`] events to
//! the task that owns the session, which applies them in order with its
//! other inputs.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

const TICK_BUFFER: usize = 8;

/// One elapsed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Spawns periodic tick tasks.
#[derive(Debug, Clone, Copy)]
pub struct Ticker;

impl Ticker {
    /// Start emitting a [`Tick`] every `period`, beginning one period from now.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(period: Duration) -> (TickHandle, TickStream) {
        let (tx, rx) = mpsc::channel(TICK_BUFFER);
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick).await.is_err() {
                    tracing::trace!("tick receiver dropped");
                    break;
                }
            }
        });
        (TickHandle { task: Some(task) }, TickStream { rx })
    }
}

/// Owner side of a running ticker. Dropping it cancels the ticker.
#[derive(Debug)]
pub struct TickHandle {
    task: Option<JoinHandle<()>>,
}

impl TickHandle {
    /// Stop the ticker. No new ticks are produced afterwards; ticks already
    /// buffered may still be received.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("ticker cancelled");
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.task.is_none()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Receiving side of a ticker.
#[derive(Debug)]
pub struct TickStream {
    rx: mpsc::Receiver<Tick>,
}

impl TickStream {
    /// Wait for the next tick. Returns `None` once the ticker is gone and the
    /// buffer is drained.
    pub async fn recv(&mut self) -> Option<Tick> {
        self.rx.recv().await
    }
}
