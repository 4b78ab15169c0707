//! Background operation management.
//!
//! Handles long-running workspace operations with:
//! - At most one task in flight per operation kind
//! - Cooperative cancellation through a per-task token
//! - Progress and completion events delivered over a channel
//! - A completion boundary where cancelled results are suppressed
//!
//! Tasks never touch workspace state. They post [`OperationEvent`]s, and the
//! owner feeds each event back through [`OperationController::resolve`]
//! before applying anything. That call is the only place a task's
//! cancellation token is consulted.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::config::SimulationConfig;
use super::error::{WorkspaceError, WorkspaceResult};
use super::simulation::{self, SimulationReport};
use crate::service::PlanSourceData;

/// Unique identifier for an operation task.
pub type OperationId = u64;

/// Kinds of long-running operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Verification plan generation through the generation service
    PlanGeneration,
    /// Testbench generation through the generation service
    TestbenchGeneration,
    /// Simulation run
    Simulation,
}

impl OperationKind {
    /// All kinds.
    pub const ALL: [OperationKind; 3] =
        [Self::PlanGeneration, Self::TestbenchGeneration, Self::Simulation];

    /// Human-readable name of the operation.
    pub fn label(self) -> &'static str {
        match self {
            Self::PlanGeneration => "Verification Plan generation",
            Self::TestbenchGeneration => "Testbench generation",
            Self::Simulation => "Simulation",
        }
    }

    /// Verb phrase used in failure messages.
    pub fn action(self) -> &'static str {
        match self {
            Self::PlanGeneration => "generate Verification Plan",
            Self::TestbenchGeneration => "generate testbench",
            Self::Simulation => "run simulation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result payload of a finished operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    /// Raw verification plan data
    Plan(PlanSourceData),
    /// Testbench generated
    Testbench,
    /// Simulation report
    Simulation(SimulationReport),
}

/// Event posted by a running task.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationEvent {
    /// A simulation tick
    Progress { id: OperationId, kind: OperationKind, percent: u8 },
    /// The task reached its completion boundary
    Finished { id: OperationId, kind: OperationKind, result: Result<OperationOutput, String> },
}

/// What the owner should do with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Show new progress
    Progress { kind: OperationKind, percent: u8 },
    /// Apply the result to workspace state
    Completed { kind: OperationKind, result: Result<OperationOutput, String> },
    /// Ignore: the task was cancelled or superseded
    Suppressed { kind: OperationKind },
}

/// Bookkeeping for the current task of one kind.
#[derive(Debug)]
struct TaskSlot {
    id: OperationId,
    token: CancellationToken,
    /// Tick timer of a simulation run; aborted on cancel
    timer: Option<AbortHandle>,
    progress: Option<u8>,
    started_at: Instant,
}

/// Runs long operations in the background, one per kind.
pub struct OperationController {
    slots: HashMap<OperationKind, TaskSlot>,
    next_id: OperationId,
    timeout: Option<Duration>,
    event_tx: UnboundedSender<OperationEvent>,
    event_rx: UnboundedReceiver<OperationEvent>,
}

impl fmt::Debug for OperationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationController")
            .field("running", &self.running())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for OperationController {
    fn default() -> Self {
        Self::new(None)
    }
}

impl OperationController {
    /// Create a controller; `timeout` bounds every generation call.
    pub fn new(timeout: Option<Duration>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self { slots: HashMap::new(), next_id: 1, timeout, event_tx, event_rx }
    }

    /// Whether a live (not cancelled) task of this kind exists.
    pub fn is_running(&self, kind: OperationKind) -> bool {
        self.slots.get(&kind).is_some_and(|slot| !slot.token.is_cancelled())
    }

    /// Whether the current task of this kind was cancelled and not yet replaced.
    pub fn is_cancelled(&self, kind: OperationKind) -> bool {
        self.slots.get(&kind).is_some_and(|slot| slot.token.is_cancelled())
    }

    /// Kinds with a live task.
    pub fn running(&self) -> Vec<OperationKind> {
        OperationKind::ALL.into_iter().filter(|kind| self.is_running(*kind)).collect()
    }

    /// Whether any live task exists.
    pub fn is_busy(&self) -> bool {
        OperationKind::ALL.into_iter().any(|kind| self.is_running(kind))
    }

    /// Last reported progress of a live task.
    pub fn progress(&self, kind: OperationKind) -> Option<u8> {
        self.slots.get(&kind).filter(|slot| !slot.token.is_cancelled()).and_then(|s| s.progress)
    }

    /// How long the live task of this kind has been running.
    pub fn elapsed(&self, kind: OperationKind) -> Option<Duration> {
        self.slots
            .get(&kind)
            .filter(|slot| !slot.token.is_cancelled())
            .map(|slot| slot.started_at.elapsed())
    }

    fn reserve(&mut self, kind: OperationKind) -> WorkspaceResult<OperationId> {
        if self.is_running(kind) {
            return Err(WorkspaceError::validation(format!("{} is already running", kind)));
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }

    fn install(&mut self, kind: OperationKind, id: OperationId, timer: Option<AbortHandle>) {
        let slot = TaskSlot {
            id,
            token: CancellationToken::new(),
            timer,
            progress: None,
            started_at: Instant::now(),
        };
        if let Some(previous) = self.slots.insert(kind, slot) {
            if let Some(timer) = previous.timer {
                timer.abort();
            }
        }
        tracing::info!(kind = %kind, id, "Operation started");
    }

    /// Start a generation task.
    ///
    /// `work` runs to completion even if the task is cancelled; only the
    /// reaction to its result is suppressed.
    pub fn start<F>(&mut self, kind: OperationKind, work: F) -> WorkspaceResult<OperationId>
    where
        F: Future<Output = anyhow::Result<OperationOutput>> + Send + 'static,
    {
        let id = self.reserve(kind)?;
        let tx = self.event_tx.clone();
        let timeout = self.timeout;

        let task = tokio::spawn(async move {
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, work).await {
                    Ok(result) => result,
                    Err(_) => Err(anyhow::anyhow!("timed out after {} seconds", limit.as_secs())),
                },
                None => work.await,
            }
        });
        tokio::spawn(async move {
            if let Some(result) = joined(kind, task).await {
                let result = result.map_err(|e| format!("{:#}", e));
                let _ = tx.send(OperationEvent::Finished { id, kind, result });
            }
        });

        self.install(kind, id, None);
        Ok(id)
    }

    /// Start a simulation run driven by the tick timer.
    pub fn start_simulation(&mut self, config: SimulationConfig) -> WorkspaceResult<OperationId> {
        let kind = OperationKind::Simulation;
        let id = self.reserve(kind)?;
        let tx = self.event_tx.clone();

        let progress_tx = tx.clone();
        let task = tokio::spawn(async move {
            let report = simulation::run(config, move |percent| {
                let _ = progress_tx.send(OperationEvent::Progress { id, kind, percent });
            })
            .await;
            Ok(OperationOutput::Simulation(report))
        });
        let timer = task.abort_handle();
        tokio::spawn(async move {
            if let Some(result) = joined(kind, task).await {
                let result = result.map_err(|e| format!("{:#}", e));
                let _ = tx.send(OperationEvent::Finished { id, kind, result });
            }
        });

        self.install(kind, id, Some(timer));
        Ok(id)
    }

    /// Cancel the live task of this kind.
    ///
    /// Returns `false` when there is nothing to cancel, including when the
    /// task already crossed its completion boundary.
    pub fn cancel(&mut self, kind: OperationKind) -> bool {
        match self.slots.get_mut(&kind) {
            Some(slot) if !slot.token.is_cancelled() => {
                slot.token.cancel();
                if let Some(timer) = slot.timer.take() {
                    timer.abort();
                }
                tracing::info!(kind = %kind, id = slot.id, "Operation cancelled");
                true
            }
            _ => false,
        }
    }

    /// Cancel and forget every task. Used when the project changes.
    pub fn cancel_all(&mut self) {
        for (kind, slot) in self.slots.drain() {
            slot.token.cancel();
            if let Some(timer) = slot.timer {
                timer.abort();
            }
            tracing::debug!(kind = %kind, id = slot.id, "Operation dropped");
        }
    }

    /// Completion boundary: decide what an event means for workspace state.
    pub fn resolve(&mut self, event: OperationEvent) -> Resolution {
        match event {
            OperationEvent::Progress { id, kind, percent } => match self.slots.get_mut(&kind) {
                Some(slot) if slot.id == id && !slot.token.is_cancelled() => {
                    slot.progress = Some(percent);
                    Resolution::Progress { kind, percent }
                }
                _ => Resolution::Suppressed { kind },
            },
            OperationEvent::Finished { id, kind, result } => {
                if !self.slots.get(&kind).is_some_and(|slot| slot.id == id) {
                    tracing::debug!(kind = %kind, id, "Result of superseded operation ignored");
                    return Resolution::Suppressed { kind };
                }
                let Some(slot) = self.slots.remove(&kind) else {
                    return Resolution::Suppressed { kind };
                };
                if slot.token.is_cancelled() {
                    tracing::debug!(kind = %kind, id, "Result of cancelled operation ignored");
                    return Resolution::Suppressed { kind };
                }
                tracing::info!(
                    kind = %kind,
                    id,
                    success = result.is_ok(),
                    elapsed_ms = slot.started_at.elapsed().as_millis() as u64,
                    "Operation finished"
                );
                Resolution::Completed { kind, result }
            }
        }
    }

    /// Take the next event without waiting.
    pub fn try_next_event(&mut self) -> Option<OperationEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Wait for the next event.
    ///
    /// Returns `None` immediately when no live task could produce one.
    pub async fn next_event(&mut self) -> Option<OperationEvent> {
        if let Some(event) = self.try_next_event() {
            return Some(event);
        }
        if !self.is_busy() {
            return None;
        }
        self.event_rx.recv().await
    }
}

/// Await a task, turning a panic into an ordinary failure.
///
/// `None` means the task was aborted and nothing should be reported.
async fn joined(
    kind: OperationKind,
    task: JoinHandle<anyhow::Result<OperationOutput>>,
) -> Option<anyhow::Result<OperationOutput>> {
    match task.await {
        Ok(result) => Some(result),
        Err(e) if e.is_cancelled() => None,
        Err(e) => {
            tracing::error!(kind = %kind, error = %e, "Operation task panicked");
            Some(Err(anyhow::anyhow!("{} panicked", kind)))
        }
    }
}

impl Drop for OperationController {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
