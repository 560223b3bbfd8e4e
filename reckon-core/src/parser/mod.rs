// reckon-core/src/parser/mod.rs

pub mod builtins;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod symbols;

#[cfg(test)]
mod evaluator_tests;

pub use error::EvalError;
pub use evaluator::{evaluate, format_number, EvaluationOutcome, Evaluator};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use symbols::{NativeFn, SymbolEntry, SymbolTable, UserFunction};
