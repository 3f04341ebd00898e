//! Run metrics: loop guard, trace log and execution timing.
//!
//! Metrics observe every step of a run as a side channel. They never
//! influence which state comes next, except through the loop guard.

mod budget;
mod trace;

pub use budget::{LoopBudget, LoopGuard};
pub use trace::{TraceEvent, TraceLog};

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Counters, trace and timestamps for the current run.
#[derive(Clone, Debug)]
pub struct Metrics {
    run_id: Uuid,
    guard: LoopGuard,
    trace: TraceLog,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Metrics {
    pub fn new(budget: LoopBudget) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            guard: LoopGuard::new(budget),
            trace: TraceLog::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Start a fresh run: new id, zeroed counter, empty trace, new start time.
    pub fn begin_run(&mut self) {
        self.run_id = Uuid::new_v4();
        self.guard.reset();
        self.trace.clear();
        self.started_at = Utc::now();
        self.finished_at = None;
    }

    pub(crate) fn mark_finished(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub(crate) fn guard_mut(&mut self) -> &mut LoopGuard {
        &mut self.guard
    }

    pub(crate) fn trace_mut(&mut self) -> &mut TraceLog {
        &mut self.trace
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn guard(&self) -> &LoopGuard {
        &self.guard
    }

    pub fn loop_counter(&self) -> usize {
        self.guard.counter()
    }

    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Total run duration, once the run has reached `end`.
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at.map(|end| span(self.started_at, end))
    }

    /// Time since the run started, or the full duration if it finished.
    pub fn elapsed(&self) -> Duration {
        span(self.started_at, self.finished_at.unwrap_or_else(Utc::now))
    }
}

fn span(start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
    end.signed_duration_since(start)
        .to_std()
        .unwrap_or(Duration::ZERO)
}
