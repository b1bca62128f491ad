//! Per-kind export task state
//!
//! One small state machine per export kind, held in an arena indexed by
//! [`ExportKind::index`]. A slot in `Running` refuses further triggers, so at
//! most one attempt per kind is ever in flight.

use super::options::ExportKind;
use log::debug;
use std::time::Duration;
use tokio::time::Instant;

/// Observable state of one export kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    #[default]
    Idle,
    Running,
    /// Settled successfully, still inside the display window
    Succeeded,
    /// Settled with an error, still inside the display window
    Failed,
}

impl TaskState {
    pub fn label(&self) -> &'static str {
        match self {
            TaskState::Idle => "idle",
            TaskState::Running => "running",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TaskSlot {
    state: TaskState,
    settled_at: Option<Instant>,
    attempts: u32,
}

/// Arena of task slots, one per export kind.
#[derive(Debug, Clone)]
pub struct TaskArena {
    slots: [TaskSlot; ExportKind::COUNT],
    display_window: Duration,
}

impl TaskArena {
    pub fn new(display_window: Duration) -> Self {
        Self {
            slots: [TaskSlot::default(); ExportKind::COUNT],
            display_window,
        }
    }

    /// Move `kind` to `Running`.
    ///
    /// Returns `false` (and changes nothing) if an attempt is already running.
    pub fn begin(&mut self, kind: ExportKind) -> bool {
        let slot = &mut self.slots[kind.index()];
        if slot.state == TaskState::Running {
            debug!("{} export already running, trigger ignored", kind.label());
            return false;
        }
        slot.state = TaskState::Running;
        slot.settled_at = None;
        slot.attempts += 1;
        debug!("{} export running (attempt {})", kind.label(), slot.attempts);
        true
    }

    /// Record the outcome of the running attempt for `kind`.
    pub fn settle(&mut self, kind: ExportKind, succeeded: bool) {
        let slot = &mut self.slots[kind.index()];
        if slot.state != TaskState::Running {
            return;
        }
        slot.state = if succeeded {
            TaskState::Succeeded
        } else {
            TaskState::Failed
        };
        slot.settled_at = Some(Instant::now());
        debug!("{} export settled: {}", kind.label(), slot.state.label());
    }

    /// Current state, with settled outcomes reading as `Idle` after the window.
    pub fn state(&self, kind: ExportKind) -> TaskState {
        let slot = &self.slots[kind.index()];
        match (slot.state, slot.settled_at) {
            (TaskState::Succeeded | TaskState::Failed, Some(at))
                if at.elapsed() >= self.display_window =>
            {
                TaskState::Idle
            }
            (state, _) => state,
        }
    }

    /// Number of accepted triggers for `kind`.
    pub fn attempts(&self, kind: ExportKind) -> u32 {
        self.slots[kind.index()].attempts
    }
}

impl Default for TaskArena {
    fn default() -> Self {
        Self::new(super::options::DEFAULT_SUCCESS_WINDOW)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
