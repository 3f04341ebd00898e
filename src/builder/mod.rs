//! Builder API for ergonomic machine construction.
//!
//! The builder registers states and transitions fluently and checks at
//! `build()` time that the reserved `start` and `end` states exist.
//!
//! # Example
//!
//! ```
//! use stepwise::builder::MachineBuilder;
//! use stepwise::core::Outcome;
//! use stepwise::metrics::LoopBudget;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut machine = MachineBuilder::new()
//!     .loop_budget(LoopBudget::from_limit(20))
//!     .state("start", |_| Ok(Outcome::next("end")))?
//!     .state("end", |_| Ok(Outcome::Done))?
//!     .transition("start", "end", || Ok(()))?
//!     .build()?;
//!
//! machine.start()?;
//! assert!(machine.is_finished());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;
