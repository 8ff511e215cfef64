use crate::controller::{SessionController, SessionSnapshot};
use crate::error::{Result, SessionError};
use picker_candidates::{Candidate, CandidatePools};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};

const COMMAND_BUFFER: usize = 64;

enum SessionCommand {
    QueryChanged(String),
    ActivateRow(Candidate),
    PoolsChanged(Arc<CandidatePools>),
    FirstPaint,
    Dismiss,
    Shutdown,
}

/// Handle to a picker session driven by a tokio task.
///
/// The task owns the [`SessionController`] exclusively, waits for commands
/// or the debounce deadline, and publishes a [`SessionSnapshot`] after every
/// change. It ends on commit, dismiss, or when the last handle is dropped;
/// a pending recomputation never runs after that.
#[derive(Clone)]
pub struct PickerSession {
    inner: Arc<PickerSessionInner>,
}

struct PickerSessionInner {
    command_tx: mpsc::Sender<SessionCommand>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl PickerSession {
    /// Mount the controller and spawn its driver on the current runtime
    pub fn start(mut controller: SessionController) -> Self {
        controller.mount();

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, _) = watch::channel(controller.snapshot());

        spawn_session_loop(controller, command_rx, snapshot_tx.clone());

        Self {
            inner: Arc::new(PickerSessionInner {
                command_tx,
                snapshot_tx,
            }),
        }
    }

    pub async fn query_changed(&self, text: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::QueryChanged(text.into())).await
    }

    pub async fn activate_row(&self, candidate: Candidate) -> Result<()> {
        self.send(SessionCommand::ActivateRow(candidate)).await
    }

    pub async fn pools_changed(&self, pools: Arc<CandidatePools>) -> Result<()> {
        self.send(SessionCommand::PoolsChanged(pools)).await
    }

    pub async fn first_paint(&self) -> Result<()> {
        self.send(SessionCommand::FirstPaint).await
    }

    pub async fn dismiss(&self) -> Result<()> {
        self.send(SessionCommand::Dismiss).await
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.command_tx.is_closed()
    }

    async fn send(&self, command: SessionCommand) -> Result<()> {
        self.inner
            .command_tx
            .send(command)
            .await
            .map_err(SessionError::from)
    }
}

impl Drop for PickerSession {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            if let Err(err) = self.inner.command_tx.try_send(SessionCommand::Shutdown) {
                // Dropping the sender closes the channel, which also ends the loop.
                log::debug!("picker session shutdown not queued: {err}");
            }
        }
    }
}

fn spawn_session_loop(
    mut controller: SessionController,
    mut command_rx: mpsc::Receiver<SessionCommand>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
) {
    tokio::spawn(async move {
        loop {
            let next_deadline = controller.next_deadline();

            tokio::select! {
                command = command_rx.recv() => {
                    let Some(command) = command else { break };
                    match command {
                        SessionCommand::QueryChanged(text) => {
                            controller.on_query_changed(text, Instant::now());
                        }
                        SessionCommand::ActivateRow(candidate) => {
                            controller.on_row_activated(&candidate);
                        }
                        SessionCommand::PoolsChanged(pools) => controller.on_pools_changed(pools),
                        SessionCommand::FirstPaint => controller.on_first_paint(),
                        SessionCommand::Dismiss => controller.on_dismiss(),
                        SessionCommand::Shutdown => break,
                    }
                }
                () = async {
                    if let Some(deadline) = next_deadline {
                        time::sleep_until(deadline).await;
                    }
                }, if next_deadline.is_some() => {
                    if controller.poll(Instant::now()) {
                        log::debug!(
                            "recomputed options for {:?} (#{})",
                            controller.applied_query(),
                            controller.recompute_count()
                        );
                    }
                }
            }

            snapshot_tx.send_replace(controller.snapshot());
            if controller.is_terminal() {
                break;
            }
        }

        controller.teardown();
        snapshot_tx.send_replace(controller.snapshot());
        log::debug!("picker session loop finished");
    });
}
