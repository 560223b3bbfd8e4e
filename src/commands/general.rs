//! General REPL commands (help, vars, reset, quit)

use crate::commands::{CommandContext, CommandResult};
use colored::*;
use reckon_core::parser::builtins;
use reckon_core::parser::lexer::is_identifier;

/// Handle `help` command
pub fn cmd_help(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    if !args.is_empty() {
        return CommandResult::NotACommand;
    }
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    if !args.is_empty() {
        return CommandResult::NotACommand;
    }
    CommandResult::Exit
}

/// Handle `vars [name]` command
pub fn cmd_vars(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let symbols = ctx.evaluator.symbols();

    if args.is_empty() {
        let listing: Vec<String> = symbols
            .iter()
            .map(|(name, entry)| format!("  {}", entry.describe(name)))
            .collect();
        return CommandResult::Message(listing.join("\n"));
    }

    if !is_identifier(args) {
        return CommandResult::NotACommand;
    }
    match symbols.get(args) {
        Some(entry) => CommandResult::Message(entry.describe(args)),
        None => CommandResult::Error(format!("Unknown variable {}", args)),
    }
}

/// Handle `reset` command
pub fn cmd_reset(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !args.is_empty() {
        return CommandResult::NotACommand;
    }
    ctx.evaluator.reset();
    CommandResult::Message("Symbol table reset".bright_green().to_string())
}

/// Print help information
fn print_help() {
    println!("{}", "Reckon Calculator Help".bold());
    println!("{}", "======================".bold());
    println!();
    println!("{}", "Arithmetic:".green());
    println!("  {}       - Operators + - * / ^", "1+4*2^3".cyan());
    println!("  {}       - Parentheses group", "2*(1+3)".cyan());
    println!("  {}          - Signed values", "2--1".cyan());
    println!();
    println!("{}", "Variables:".green());
    println!("  {}          - Assign", "x=-3".cyan());
    println!("  {}         - Use", "x + 1".cyan());
    println!();
    println!("{}", "Functions:".green());
    println!("  {}   - Declare (one parameter)", "f(x)=4*x^-x".cyan());
    println!("  {}        - Invoke", "3+f(2)".cyan());
    println!();
    println!("{}", "Builtins:".green());
    for builtin in builtins::FUNCTIONS {
        let call = format!("{:<10}", format!("{}(n)", builtin.name));
        println!("  {} - {}", call.cyan(), builtin.description);
    }
    for (name, _) in builtins::CONSTANTS {
        let constant = format!("{:<10}", name);
        println!("  {} - constant", constant.cyan());
    }
    println!();
    println!("{}", "Commands:".green());
    println!("  {}          - List symbols (or one symbol)", "vars [name]".cyan());
    println!("  {}          - Forget assignments and declarations", "reset".cyan());
    println!("  {}     - Leave the REPL", "quit / exit".cyan());
}
