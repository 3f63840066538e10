//! Write-behind persistence for the progress store.
//!
//! Mutations enqueue a full snapshot and return immediately. A single
//! background task drains the queue and writes the newest snapshot; when
//! several are queued only the last one is written. Failures are logged and
//! dropped; the next successful write carries the full latest state.

use realms_core::model::ProgressState;
use storage::repository::SnapshotRepository;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum WriteCommand {
    Persist(Box<ProgressState>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background snapshot writer.
#[derive(Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl SnapshotWriter {
    /// Spawn the writer task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[must_use]
    pub fn spawn(snapshots: SnapshotRepository) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(snapshots, rx));
        Self { tx }
    }

    /// Queue `state` for writing. Never blocks.
    pub fn enqueue(&self, state: ProgressState) {
        if self
            .tx
            .send(WriteCommand::Persist(Box::new(state)))
            .is_err()
        {
            warn!("snapshot writer has stopped; progress change not persisted");
        }
    }

    /// Wait until every snapshot queued before this call has been handled.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(ack)).is_err() {
            warn!("snapshot writer has stopped; nothing to flush");
            return;
        }
        let _ = done.await;
    }
}

async fn run_writer(snapshots: SnapshotRepository, mut rx: mpsc::UnboundedReceiver<WriteCommand>) {
    while let Some(first) = rx.recv().await {
        let mut latest = None;
        let mut acks = Vec::new();
        let mut next = Some(first);
        while let Some(command) = next {
            match command {
                WriteCommand::Persist(state) => latest = Some(state),
                WriteCommand::Flush(ack) => acks.push(ack),
            }
            next = rx.try_recv().ok();
        }

        if let Some(state) = latest {
            match snapshots.save(&state).await {
                Ok(()) => debug!("progress snapshot written"),
                Err(err) => warn!(error = %err, "failed to write progress snapshot"),
            }
        }

        for ack in acks {
            let _ = ack.send(());
        }
    }
    debug!("snapshot writer stopped");
}
