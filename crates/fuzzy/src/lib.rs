//! Minimal Mamdani-style fuzzy inference library for turn-based game agents.
//!
//! This library provides the small, deterministic subset of fuzzy control
//! that a decision engine for a turn-based game actually needs:
//!
//! - **Automatic partitions**: Inputs are fuzzified through equal triangular
//!   membership regions with the conventional level names
//!   (poor / mediocre / average / decent / good)
//! - **Declarative rules**: Condition trees (`all` / `any` / leaf terms) kept
//!   as data, evaluated by one generic routine
//! - **Banded output**: The output scale is split into contiguous equal-width
//!   categories; the defuzzified scalar resolves to exactly one band
//! - **No hidden state**: Evaluation is a pure function of the sample; the
//!   same inputs always produce the same verdict
//!
//! # Architecture
//!
//! - [`Partition`]: A fuzzified input variable with its membership terms
//! - [`Condition`] / [`Rule`]: The declarative rule table
//! - [`OutputSpace`]: The banded output scale
//! - [`ControlSystem`]: Validates the table and runs min/max composition,
//!   per-band max aggregation, and centroid defuzzification
//!
//! # Example
//!
//! ```
//! use fuzzy_control::{all, any, term, ControlSystem, Levels, OutputSpace, Partition, Rule, Sample};
//!
//! let system = ControlSystem::new(
//!     vec![Partition::automatic("hunger", 0.0, 10.0, Levels::Three)],
//!     OutputSpace::banded("action", 0.0, 20.0, &["rest", "eat"]),
//!     vec![
//!         Rule::new(term("hunger", "poor"), "rest"),
//!         Rule::new(any([term("hunger", "average"), term("hunger", "good")]), "eat"),
//!     ],
//! )
//! .unwrap();
//!
//! let verdict = system.evaluate(&Sample::new().with("hunger", 9.0)).unwrap();
//! assert_eq!(verdict.band, "eat");
//! ```

pub mod error;
pub mod membership;
pub mod output;
pub mod rule;
pub mod system;
pub mod variable;

// Re-export core types for ergonomic API
pub use error::FuzzyError;
pub use membership::Triangle;
pub use output::OutputSpace;
pub use rule::{Condition, Rule, all, any, term};
pub use system::{ControlSystem, Sample, Verdict};
pub use variable::{Levels, Partition, Term};
