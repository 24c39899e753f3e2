//! CLI argument parsing and command dispatch

pub mod args;
pub mod check;
pub mod common;
pub mod eval;
pub mod list;

// Re-export types for convenient access
pub use args::{Cli, ColorChoice, Command, EngineChoice, OutputFormat};
pub use eval::EvalArgs;

/// Runs a parsed command line and returns the process exit code
pub fn dispatch(cli: Cli) -> i32 {
    match cli.command {
        Command::Check {
            paths,
            config,
            format,
        } => check::run_check(&paths, &config, format, cli.color),
        Command::Eval {
            expression,
            engine,
            value,
            file,
            property_node,
            message,
            format,
        } => eval::run_eval(
            &EvalArgs {
                expression,
                engine: engine.into(),
                value,
                file,
                property_node,
                message,
                format,
            },
            cli.color.unwrap_or(ColorChoice::Auto),
        ),
        Command::List { config, format } => list::run_list(&config, format, cli.color),
    }
}
