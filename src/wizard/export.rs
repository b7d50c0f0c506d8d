//! Simulated export
//!
//! The export is a fixed delay with no real work behind it. Each run gets an
//! [`ExportTicket`]; the timer task reports back with an [`ExportFinished`]
//! that the owning session only accepts while the ticket is still live.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Default simulated build duration
pub const DEFAULT_EXPORT_DELAY: Duration = Duration::from_millis(5500);

/// Export sub-machine: idle, running, done. There is no failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportPhase {
    #[default]
    Idle,
    InProgress,
    Completed,
}

impl ExportPhase {
    pub fn is_in_progress(&self) -> bool {
        *self == Self::InProgress
    }

    pub fn is_completed(&self) -> bool {
        *self == Self::Completed
    }
}

/// Handle for one export run
#[derive(Debug, Clone)]
pub struct ExportTicket {
    pub session_id: Uuid,
    pub job_id: u64,
    cancel: CancellationToken,
}

impl ExportTicket {
    pub(crate) fn new(session_id: Uuid, job_id: u64) -> Self {
        Self {
            session_id,
            job_id,
            cancel: CancellationToken::new(),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The message the timer delivers for this run
    pub fn finished(&self) -> ExportFinished {
        ExportFinished {
            session_id: self.session_id,
            job_id: self.job_id,
        }
    }
}

/// Completion notice sent by the timer task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFinished {
    pub session_id: Uuid,
    pub job_id: u64,
}

/// Spawn the timer for `ticket`.
///
/// After `delay` the task calls `notify` once. If the ticket is cancelled
/// first (session reset or dropped) the task exits without notifying.
pub fn spawn_export_timer<F>(ticket: &ExportTicket, delay: Duration, notify: F) -> JoinHandle<()>
where
    F: FnOnce(ExportFinished) + Send + 'static,
{
    let cancel = ticket.cancel.clone();
    let finished = ticket.finished();

    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Export job {} cancelled before completion", finished.job_id);
            }
            _ = tokio::time::sleep(delay) => {
                tracing::info!("Export job {} finished after {:?}", finished.job_id, delay);
                notify(finished);
            }
        }
    })
}
