//! The engine reports its progress through `tracing`.

use std::fmt;
use std::sync::{Arc, Mutex};
use stepwise::{Machine, MachineConfig, Outcome};
use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}

struct EventRecorder {
    messages: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventRecorder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            self.messages.lock().unwrap().push(message);
        }
    }
}

fn record_run<F>(run: F) -> Vec<String>
where
    F: FnOnce(),
{
    let messages = Arc::new(Mutex::new(Vec::new()));
    let recorder = EventRecorder {
        messages: Arc::clone(&messages),
    };
    let subscriber = tracing_subscriber::registry().with(recorder);

    tracing::subscriber::with_default(subscriber, run);

    let recorded = messages.lock().unwrap().clone();
    recorded
}

fn count(messages: &[String], needle: &str) -> usize {
    messages.iter().filter(|m| m.as_str() == needle).count()
}

#[test]
fn run_emits_transition_and_entry_events() {
    let messages = record_run(|| {
        let mut machine = Machine::new(MachineConfig::with_loop_budget(10));
        machine.add_state("start", |_| Ok(Outcome::next("end"))).unwrap();
        machine.add_state("end", |_| Ok(Outcome::Done)).unwrap();
        machine.add_transition("start", "end", || Ok(())).unwrap();
        machine.start().unwrap();
    });

    assert_eq!(count(&messages, "run started"), 1);
    assert_eq!(count(&messages, "state entered"), 2);
    assert_eq!(count(&messages, "transition fired"), 1);
    assert_eq!(count(&messages, "run finished"), 1);
}

#[test]
fn suspension_and_resume_are_reported() {
    let messages = record_run(|| {
        let mut machine = Machine::default();
        machine.add_state("start", |_| Ok(Outcome::Suspend)).unwrap();
        machine.add_state("end", |_| Ok(Outcome::Done)).unwrap();
        machine.start().unwrap();
        machine.resume("end").unwrap();
    });

    assert_eq!(count(&messages, "run suspended"), 1);
    assert_eq!(count(&messages, "run resumed"), 1);
    assert_eq!(count(&messages, "run finished"), 1);
}

#[test]
fn failures_are_reported() {
    let messages = record_run(|| {
        let mut machine = Machine::new(MachineConfig::with_loop_budget(3));
        machine.add_state("start", |_| Ok(Outcome::next("start"))).unwrap();
        machine.add_state("end", |_| Ok(Outcome::Done)).unwrap();
        assert!(machine.start().is_err());
    });

    assert_eq!(count(&messages, "run failed"), 1);
    assert_eq!(count(&messages, "run finished"), 0);
}
