//! Asynchronous Approval
//!
//! This example demonstrates suspending a run while waiting on external input.
//!
//! Key concepts:
//! - `Outcome::Suspend` pauses the step loop without an error
//! - The host resumes the run once the awaited decision arrives
//! - Snapshots expose the execution state as JSON
//!
//! Run with: cargo run --example async_approval

use stepwise::{Machine, MachineConfig, Outcome};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Asynchronous Approval Example ===\n");

    let mut machine = Machine::new(MachineConfig::from_json(
        r#"{ "loop_budget": { "bounded": 20 } }"#,
    )?);

    machine.add_state("start", |_| Ok(Outcome::next("submit")))?;
    machine.add_state("submit", |_| Ok(Outcome::next("await-approval")))?;
    // Approval comes from a human reviewer, outside the step loop.
    machine.add_state("await-approval", |_| Ok(Outcome::Suspend))?;
    machine.add_state("approved", |_| Ok(Outcome::next("end")))?;
    machine.add_state("rejected", |_| Ok(Outcome::next("end")))?;
    machine.add_state("end", |_| Ok(Outcome::Done))?;

    machine.add_transition("await-approval", "approved", || {
        println!("-> notifying requester: approved");
        Ok(())
    })?;

    machine
        .data_mut()
        .insert("ticket".to_string(), serde_json::json!("CHG-1042"));

    machine.start()?;
    println!("Phase after start: {}", machine.phase());
    println!("Waiting in: {:?}", machine.current_status());
    println!(
        "Snapshot: {}",
        serde_json::to_string_pretty(&machine.snapshot())?
    );

    // ... the reviewer approves some time later
    machine.resume("Approved")?;

    println!("\nPhase after resume: {}", machine.phase());
    println!(
        "Path: {:?}",
        machine
            .trace()
            .entered_states()
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
