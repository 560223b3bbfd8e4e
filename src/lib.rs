//! # Reckon
//!
//! Command-line shell around [`reckon_core`]: a one-shot evaluator and an
//! interactive REPL that keeps variables and declared functions for the
//! length of a session.
//!
//! ## Modules
//!
//! - `commands`: REPL commands (`help`, `vars`, `reset`, `quit`) resolved
//!   before a line is evaluated.
//! - `repl`: the Read-Eval-Print Loop.

pub mod commands;
pub mod repl;

pub use reckon_core::{evaluate, EvalError, EvaluationOutcome, Evaluator};
