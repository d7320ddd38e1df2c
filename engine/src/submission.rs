//! Submission lifecycle for the terminal step of a flow.
//!
//! ```text
//!          submit()             resolved Ok
//!   Idle ───────────▶ Pending ──────────────▶ Succeeded
//!    ▲                 │  │
//!    │    cancel()     │  │ resolved Err
//!    └─────────────────┘  ▼
//!                       Failed ── submit() ──▶ Pending
//! ```
//!
//! Each accepted `submit` bumps a generation counter and spawns the mutation
//! inside an [`Abortable`]. The spawned task reports back through a channel
//! tagged with its generation; anything that does not match the current
//! generation (a cancelled attempt that finished anyway) is discarded.

use std::future::Future;

use futures_util::future::{AbortHandle, Abortable};
use rise_providers::MutationError;
use rise_types::SubmissionStatus;
use tokio::sync::mpsc;

/// A finished attempt, as reported by the spawned task.
#[derive(Debug)]
pub struct Resolution<T> {
    generation: u64,
    result: Result<T, MutationError>,
}

impl<T> Resolution<T> {
    #[must_use]
    pub fn new(generation: u64, result: Result<T, MutationError>) -> Self {
        Self { generation, result }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started { generation: u64 },
    /// A submission is already in flight; nothing was started.
    AlreadyPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Succeeded,
    Failed(String),
    /// The resolution belonged to an earlier, cancelled attempt.
    Stale,
}

pub struct SubmissionMachine<T> {
    status: SubmissionStatus<T>,
    generation: u64,
    in_flight: Option<AbortHandle>,
    tx: mpsc::UnboundedSender<Resolution<T>>,
    rx: mpsc::UnboundedReceiver<Resolution<T>>,
}

impl<T> std::fmt::Debug for SubmissionMachine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match &self.status {
            SubmissionStatus::Idle => "Idle",
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Succeeded(_) => "Succeeded",
            SubmissionStatus::Failed(_) => "Failed",
        };
        f.debug_struct("SubmissionMachine")
            .field("status", &status)
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Default for SubmissionMachine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> SubmissionMachine<T> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            status: SubmissionStatus::Idle,
            generation: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    #[must_use]
    pub fn status(&self) -> &SubmissionStatus<T> {
        &self.status
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start an attempt unless one is already pending.
    ///
    /// `start` is only invoked when the attempt is accepted, so a rejected
    /// call never reaches the network. Must be called within a tokio runtime.
    pub fn submit<F, Fut>(&mut self, start: F) -> SubmitOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, MutationError>> + Send + 'static,
    {
        if !self.status.can_submit() {
            tracing::debug!(generation = self.generation, "Submission already pending");
            return SubmitOutcome::AlreadyPending;
        }

        self.generation += 1;
        let generation = self.generation;
        let (abort_handle, abort_registration) = AbortHandle::new_pair();
        let abortable = Abortable::new(start(), abort_registration);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            if let Ok(result) = abortable.await {
                // Receiver is gone once the owning flow is dropped.
                let _ = tx.send(Resolution::new(generation, result));
            }
        });

        self.in_flight = Some(abort_handle);
        self.status = SubmissionStatus::Pending;
        tracing::debug!(generation, "Submission started");
        SubmitOutcome::Started { generation }
    }

    pub fn apply(&mut self, resolution: Resolution<T>) -> Applied {
        if !self.status.is_pending() || resolution.generation != self.generation {
            tracing::debug!(
                stale = resolution.generation,
                current = self.generation,
                "Discarding stale submission result"
            );
            return Applied::Stale;
        }

        self.in_flight = None;
        match resolution.result {
            Ok(value) => {
                self.status = SubmissionStatus::Succeeded(value);
                Applied::Succeeded
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(generation = self.generation, error = %message, "Submission failed");
                self.status = SubmissionStatus::Failed(message.clone());
                Applied::Failed(message)
            }
        }
    }

    /// Apply a finished attempt if one is waiting. Never blocks.
    pub fn poll(&mut self) -> Option<Applied> {
        while let Ok(resolution) = self.rx.try_recv() {
            match self.apply(resolution) {
                Applied::Stale => {}
                applied => return Some(applied),
            }
        }
        None
    }

    /// Wait for the pending attempt to resolve. `None` when nothing is pending.
    pub async fn settle(&mut self) -> Option<Applied> {
        while self.status.is_pending() {
            let resolution = self.rx.recv().await?;
            match self.apply(resolution) {
                Applied::Stale => {}
                applied => return Some(applied),
            }
        }
        None
    }

    /// Abort the pending attempt. Returns whether anything was pending.
    pub fn cancel(&mut self) -> bool {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        if !self.status.is_pending() {
            return false;
        }
        // Anything already queued for the aborted attempt becomes stale.
        self.generation += 1;
        self.status = SubmissionStatus::Idle;
        tracing::debug!(generation = self.generation, "Submission cancelled");
        true
    }
}

impl<T> Drop for SubmissionMachine<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
