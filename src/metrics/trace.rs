//! Chronological trace of a run.
//!
//! The trace records every fired transition and every state entry, in the
//! order the engine performed them.

use crate::core::{display_optional, StateName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single entry in the trace log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A registered transition hook fired.
    TransitionFired {
        from: Option<StateName>,
        to: StateName,
        iteration: usize,
        timestamp: DateTime<Utc>,
    },

    /// A state became current.
    StateEntered {
        state: StateName,
        iteration: usize,
        timestamp: DateTime<Utc>,
    },
}

impl TraceEvent {
    pub fn iteration(&self) -> usize {
        match self {
            Self::TransitionFired { iteration, .. } | Self::StateEntered { iteration, .. } => {
                *iteration
            }
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::TransitionFired { timestamp, .. } | Self::StateEntered { timestamp, .. } => {
                *timestamp
            }
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransitionFired { from, to, .. } => {
                write!(f, "'{}' -> '{to}'", display_optional(from.as_ref()))
            }
            Self::StateEntered { state, .. } => write!(f, "{state}"),
        }
    }
}

/// Ordered log of trace events for one run.
///
/// # Example
///
/// ```rust
/// use stepwise::core::StateName;
/// use stepwise::metrics::TraceLog;
///
/// let mut log = TraceLog::new();
/// log.state_entered(StateName::start(), 1);
/// log.transition_fired(Some(StateName::start()), StateName::end(), 2);
/// log.state_entered(StateName::end(), 2);
///
/// let path: Vec<&str> = log.entered_states().iter().map(|s| s.as_str()).collect();
/// assert_eq!(path, vec!["start", "end"]);
/// assert_eq!(log.len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceLog {
    events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transition_fired(&mut self, from: Option<StateName>, to: StateName, iteration: usize) {
        self.events.push(TraceEvent::TransitionFired {
            from,
            to,
            iteration,
            timestamp: Utc::now(),
        });
    }

    pub fn state_entered(&mut self, state: StateName, iteration: usize) {
        self.events.push(TraceEvent::StateEntered {
            state,
            iteration,
            timestamp: Utc::now(),
        });
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// All events in order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// States entered during the run, in order.
    pub fn entered_states(&self) -> Vec<&StateName> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TraceEvent::StateEntered { state, .. } => Some(state),
                TraceEvent::TransitionFired { .. } => None,
            })
            .collect()
    }

    /// Number of transition hooks fired during the run.
    pub fn transitions_fired(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, TraceEvent::TransitionFired { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_log_is_empty() {
        let log = TraceLog::new();
        assert!(log.is_empty());
        assert!(log.entered_states().is_empty());
        assert_eq!(log.transitions_fired(), 0);
    }

    #[test]
    fn events_keep_insertion_order() {
        let mut log = TraceLog::new();
        log.transition_fired(None, StateName::start(), 1);
        log.state_entered(StateName::start(), 1);
        log.state_entered(StateName::new("middle"), 2);

        let rendered: Vec<String> = log.events().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["'<none>' -> 'start'", "start", "middle"]);
        assert_eq!(log.transitions_fired(), 1);
        assert_eq!(log.events()[2].iteration(), 2);
    }

    #[test]
    fn timestamps_are_non_decreasing() {
        let mut log = TraceLog::new();
        log.state_entered(StateName::start(), 1);
        log.state_entered(StateName::end(), 2);

        let events = log.events();
        assert!(events[0].timestamp() <= events[1].timestamp());
    }

    #[test]
    fn clear_removes_all_events() {
        let mut log = TraceLog::new();
        log.state_entered(StateName::start(), 1);

        log.clear();

        assert!(log.is_empty());
    }

    #[test]
    fn log_serializes_with_tagged_events() {
        let mut log = TraceLog::new();
        log.transition_fired(Some(StateName::start()), StateName::end(), 2);

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["events"][0]["kind"], "transition_fired");
        assert_eq!(json["events"][0]["from"], "start");

        let back: TraceLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }
}
