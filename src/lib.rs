//! Execution core of a K rewriting interpreter.
//!
//! - [`term`]: the shared, immutable K term model and its printer.
//! - [`hooks`]: native hooks for built-in sorts, looked up by name.
//! - [`collections`]: canonical ordering of maps and sets.
//! - [`step`]: the stepping engine that drives a configuration to a fixpoint.

pub mod collections;
pub mod config;
pub mod driver;
pub mod hooks;
pub mod logging;
pub mod step;
pub mod term;

pub use hooks::{HookError, HookRegistry};
pub use step::{Run, RuleSet, StepState, Stepper};
pub use term::{K, KData, KLabel, Sort};
