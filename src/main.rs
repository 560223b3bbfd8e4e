use anyhow::Result;
use clap::Parser;
use reckon::repl;
use reckon_core::parser::format_number;
use tracing_subscriber::EnvFilter;

/// reckon evaluates arithmetic expressions with variables and
/// single-parameter functions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Evaluate this expression once and exit instead of starting the REPL.
    expression: Option<String>,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,

    /// Log filter used when RUST_LOG is not set (e.g. `debug`, `reckon_core=trace`).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if args.no_color {
        colored::control::set_override(false);
    }

    match args.expression {
        Some(expression) => {
            let outcome = reckon_core::evaluate(&expression)?;
            match outcome.result {
                Some(value) => println!("{}", format_number(value)),
                None => println!("{}", outcome.display_text()),
            }
            Ok(())
        }
        None => repl::start(),
    }
}
