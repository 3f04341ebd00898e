//! Request Processing Pipeline
//!
//! This example models an HTTP request pipeline as an explicit state machine.
//!
//! Key concepts:
//! - States decide the next state from shared request data
//! - Transition hooks for side effects (audit logging)
//! - A self-transition for retrying a flaky upstream
//! - Structured trace events through `tracing`
//!
//! Run with: cargo run --example request_pipeline

use std::sync::{Arc, Mutex};
use stepwise::{HandlerResult, LoopBudget, MachineBuilder, Outcome, StateName};

#[derive(Debug, Default)]
struct Request {
    path: String,
    authorized: bool,
    upstream_attempts: u32,
    response: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Request Pipeline Example ===\n");

    let request = Arc::new(Mutex::new(Request {
        path: "/orders/42".to_string(),
        ..Request::default()
    }));
    let audit = Arc::new(Mutex::new(Vec::new()));

    let req = Arc::clone(&request);
    let authenticate = move |_: Option<&StateName>| -> HandlerResult<Outcome> {
        let mut req = req.lock().map_err(|e| e.to_string())?;
        req.authorized = req.path.starts_with("/orders");
        Ok(if req.authorized {
            Outcome::next("fetch")
        } else {
            Outcome::next("reject")
        })
    };

    let req = Arc::clone(&request);
    let fetch = move |_: Option<&StateName>| -> HandlerResult<Outcome> {
        let mut req = req.lock().map_err(|e| e.to_string())?;
        req.upstream_attempts += 1;
        // The upstream answers on the third try.
        if req.upstream_attempts < 3 {
            return Ok(Outcome::next("fetch"));
        }
        req.response = Some(format!("200 OK {}", req.path));
        Ok(Outcome::next("end"))
    };

    let req = Arc::clone(&request);
    let reject = move |_: Option<&StateName>| -> HandlerResult<Outcome> {
        req.lock().map_err(|e| e.to_string())?.response = Some("403 Forbidden".to_string());
        Ok(Outcome::next("end"))
    };

    let retry_log = Arc::clone(&audit);
    let done_log = Arc::clone(&audit);

    let mut machine = MachineBuilder::new()
        .loop_budget(LoopBudget::from_limit(16))
        .state("start", authenticate)?
        .state("fetch", fetch)?
        .state("reject", reject)?
        .state("end", |_| Ok(Outcome::Done))?
        .transition("fetch", "fetch", move || {
            retry_log
                .lock()
                .map_err(|e| e.to_string())?
                .push("retrying upstream".to_string());
            Ok(())
        })?
        .transition("fetch", "end", move || {
            done_log
                .lock()
                .map_err(|e| e.to_string())?
                .push("response ready".to_string());
            Ok(())
        })?
        .build()?;

    machine.start()?;

    println!("\nFinished: {}", machine.is_finished());
    println!("Iterations: {}", machine.loop_counter());
    println!("Duration: {:?}", machine.duration());
    println!("Request: {:?}", request.lock().map_err(|e| e.to_string())?);
    println!("Audit: {:?}", audit.lock().map_err(|e| e.to_string())?);

    println!("\nTrace:");
    for event in machine.trace().events() {
        println!("  [{}] {event}", event.iteration());
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
