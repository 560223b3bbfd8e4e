//! Command registry for REPL commands
//!
//! Commands are matched before a line is handed to the evaluator.

pub mod general;

use reckon_core::{EvalError, EvaluationOutcome, Evaluator};
use std::collections::BTreeMap;

/// Result of executing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Not a command, try evaluating as expression
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Context passed to command handlers
pub struct CommandContext {
    pub evaluator: Evaluator,
}

impl CommandContext {
    pub fn new() -> Self {
        Self {
            evaluator: Evaluator::new(),
        }
    }

    /// Evaluate an expression string against the session's symbol table
    pub fn eval(&mut self, input: &str) -> Result<EvaluationOutcome, EvalError> {
        self.evaluator.evaluate(input)
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Commands keyed by their leading keyword
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Bind `keyword` to `handler`, replacing any earlier binding
    pub fn register(&mut self, keyword: &'static str, handler: CommandHandler) {
        self.commands.insert(keyword, handler);
    }

    /// Dispatch on the first whitespace-separated word of `input`.
    /// The rest of the line, trimmed, is passed to the handler.
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        let input = input.trim();
        let (keyword, args) = input
            .split_once(char::is_whitespace)
            .unwrap_or((input, ""));

        match self.commands.get(keyword) {
            Some(handler) => handler(args.trim(), ctx),
            None => CommandResult::NotACommand,
        }
    }

    /// Registered keywords, alphabetical
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.keys().copied().collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register("help", general::cmd_help);
    registry.register("vars", general::cmd_vars);
    registry.register("reset", general::cmd_reset);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}
