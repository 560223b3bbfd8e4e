//! Symbol table for the evaluator
//!
//! Maps names to variables, native functions and user-declared functions.
//! Invoking a function works on a [`SymbolTable::snapshot`], so bindings made
//! inside the call never reach the caller's table.

use crate::parser::builtins;
use crate::parser::error::EvalError;
use crate::parser::evaluator::format_number;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Single-argument native primitive
pub type NativeFn = fn(f64) -> f64;

/// A function declared with `name(param)=body`
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    /// Parameter name bound on each invocation
    pub bound_variable: String,
    /// Body serialized back to re-parseable text
    pub body: String,
}

/// What a name refers to
#[derive(Clone)]
pub enum SymbolEntry {
    Variable(f64),
    NativeFunction(NativeFn),
    UserFunction(UserFunction),
}

impl SymbolEntry {
    pub fn user_function(bound_variable: impl Into<String>, body: impl Into<String>) -> Self {
        SymbolEntry::UserFunction(UserFunction {
            bound_variable: bound_variable.into(),
            body: body.into(),
        })
    }

    /// Stored value if this is a variable
    pub fn as_variable(&self) -> Option<f64> {
        match self {
            SymbolEntry::Variable(value) => Some(*value),
            _ => None,
        }
    }

    /// One-line description, e.g. `function f(x) = x+1`
    pub fn describe(&self, name: &str) -> String {
        match self {
            SymbolEntry::Variable(value) => format!("{} = {}", name, format_number(*value)),
            SymbolEntry::NativeFunction(_) => format!("{}(n) native function", name),
            SymbolEntry::UserFunction(f) => {
                format!("function {}({}) = {}", name, f.bound_variable, f.body)
            }
        }
    }
}

impl fmt::Debug for SymbolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolEntry::Variable(value) => write!(f, "Variable({})", value),
            SymbolEntry::NativeFunction(_) => write!(f, "NativeFunction(< fn >)"),
            SymbolEntry::UserFunction(func) => write!(f, "UserFunction({:?})", func),
        }
    }
}

/// Name to entry mapping owned by one evaluator
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: HashMap<String, Arc<SymbolEntry>>,
}

impl SymbolTable {
    /// An empty table, without builtins
    pub fn new() -> Self {
        SymbolTable {
            entries: HashMap::new(),
        }
    }

    /// A table preloaded with the native functions and constants
    pub fn with_builtins() -> Self {
        let mut table = SymbolTable::new();
        builtins::install(&mut table);
        table
    }

    /// Look up a name
    pub fn lookup(&self, name: &str) -> Result<&SymbolEntry, EvalError> {
        self.get(name).ok_or_else(|| EvalError::unknown(name))
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.get(name).map(Arc::as_ref)
    }

    /// Value of a variable, if `name` is bound to one
    pub fn variable(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(SymbolEntry::as_variable)
    }

    /// Bind `name`, replacing any previous entry
    pub fn set(&mut self, name: impl Into<String>, entry: SymbolEntry) {
        self.entries.insert(name.into(), Arc::new(entry));
    }

    /// Independent copy sharing the same entries
    pub fn snapshot(&self) -> SymbolTable {
        self.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All bindings, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolEntry)> {
        self.names()
            .into_iter()
            .filter_map(move |name| self.get(name).map(|entry| (name, entry)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
