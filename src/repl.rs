//! REPL (Read-Eval-Print Loop) for the reckon calculator

use crate::commands::{create_registry, CommandContext, CommandResult};
use anyhow::Result;
use colored::*;
use reckon_core::EvaluationOutcome;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};
use tracing::debug;

/// Interactive REPL over one evaluator session
pub struct Repl {
    editor: DefaultEditor,
    ctx: CommandContext,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new() -> RustylineResult<Self> {
        let editor = DefaultEditor::new()?;
        Ok(Repl {
            editor,
            ctx: CommandContext::new(),
        })
    }

    fn print_outcome(outcome: &EvaluationOutcome) {
        match outcome.message {
            Some(_) => println!("{}", outcome.display_text().bright_green()),
            None => println!("{}", outcome.display_text()),
        }
    }

    /// Run the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!("{}", "Reckon Calculator".bright_cyan().bold());
        println!(
            "Type expressions like: {}, {}, {}",
            "1+2*3".cyan(),
            "x=-3".cyan(),
            "f(x)=4*x^-x".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        let registry = create_registry();

        loop {
            let prompt = format!("{} ", "reckon>".bright_magenta().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line.to_owned())?;

                    match registry.execute(line, &mut self.ctx) {
                        CommandResult::Success => {}
                        CommandResult::Message(msg) => {
                            println!("{}", msg);
                        }
                        CommandResult::Exit => {
                            println!("{}", "Goodbye!".bright_cyan());
                            break;
                        }
                        CommandResult::Error(e) => {
                            println!("{} {}", "Error:".bright_red().bold(), e.red());
                        }
                        CommandResult::NotACommand => match self.ctx.eval(line) {
                            Ok(outcome) => Self::print_outcome(&outcome),
                            Err(e) => {
                                debug!(line, error = %e, "evaluation failed");
                                println!(
                                    "{} {}",
                                    "Error:".bright_red().bold(),
                                    e.to_string().red()
                                );
                            }
                        },
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }
                Err(err) => {
                    println!(
                        "{} {}",
                        "Error reading input:".bright_red().bold(),
                        err.to_string().red()
                    );
                }
            }
        }

        Ok(())
    }
}

/// Convenience function to start the REPL
pub fn start() -> Result<()> {
    let mut repl = Repl::new().map_err(|e| anyhow::anyhow!("Failed to initialize REPL: {}", e))?;
    repl.run()
}
