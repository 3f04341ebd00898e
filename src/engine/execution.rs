//! Per-instance execution state.

use crate::core::StateName;
use crate::metrics::TraceLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Lifecycle of a machine run.
///
/// `Unconfigured` and `Ready` describe a machine that has not started a run;
/// the other phases describe the latest run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Unconfigured,
    Ready,
    Running,
    Suspended,
    Finished,
    Failed,
}

impl RunPhase {
    /// True for phases that end a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unconfigured => "unconfigured",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Suspended => "suspended",
            Self::Finished => "finished",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Mutable state of the current run, owned by the engine.
///
/// `data` is reserved for the host; the engine never reads or writes it.
#[derive(Clone, Debug)]
pub struct ExecutionState {
    pub(crate) previous: Option<StateName>,
    pub(crate) current: Option<StateName>,
    pub(crate) next: Option<StateName>,
    pub(crate) finished: bool,
    pub(crate) phase: RunPhase,
    pub(crate) data: Map<String, Value>,
}

impl ExecutionState {
    pub(crate) fn new() -> Self {
        Self {
            previous: None,
            current: None,
            next: None,
            finished: false,
            phase: RunPhase::Ready,
            data: Map::new(),
        }
    }

    /// Clear the run fields. The host data bag survives restarts.
    pub(crate) fn reset(&mut self) {
        self.previous = None;
        self.current = None;
        self.next = None;
        self.finished = false;
        self.phase = RunPhase::Running;
    }

    pub fn previous(&self) -> Option<&StateName> {
        self.previous.as_ref()
    }

    pub fn current(&self) -> Option<&StateName> {
        self.current.as_ref()
    }

    /// Pending target of the step loop. `None` while suspended or after the
    /// run finished.
    pub fn next(&self) -> Option<&StateName> {
        self.next.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }
}

/// Serializable view of everything observable about a machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub run_id: Uuid,
    pub phase: RunPhase,
    pub previous: Option<StateName>,
    pub current: Option<StateName>,
    pub finished: bool,
    pub loop_counter: usize,
    pub loop_limit: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub trace: TraceLog,
    pub data: Map<String, Value>,
}
