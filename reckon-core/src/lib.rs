//! # Reckon Core
//!
//! Evaluation engine for the reckon calculator: a tokenizer, a symbol table
//! with copy-on-invoke scoping, and a precedence-driven evaluator supporting
//! variable assignment and single-parameter user functions.
//!
//! ## Features
//!
//! - **serde**: derive `Serialize`/`Deserialize` for tokens and errors
//!
//! ## Example
//!
//! ```
//! use reckon_core::Evaluator;
//!
//! let mut evaluator = Evaluator::new();
//! evaluator.evaluate("f(x)=x^2").unwrap();
//! let outcome = evaluator.evaluate("1 + f(3)").unwrap();
//! assert_eq!(outcome.result, Some(10.0));
//! ```

pub mod parser;

pub use parser::{
    evaluate, tokenize, EvalError, EvaluationOutcome, Evaluator, SymbolEntry, SymbolTable, Token,
    TokenKind,
};
