//! CLI argument parsing using clap

use crate::config;
use crate::types::Engine;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for assert-that commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

impl From<config::OutputFormat> for OutputFormat {
    fn from(format: config::OutputFormat) -> Self {
        match format {
            config::OutputFormat::Human => OutputFormat::Human,
            config::OutputFormat::Jsonl => OutputFormat::Jsonl,
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

impl From<config::ColorOption> for ColorChoice {
    fn from(color: config::ColorOption) -> Self {
        match color {
            config::ColorOption::Auto => ColorChoice::Auto,
            config::ColorOption::Always => ColorChoice::Always,
            config::ColorOption::Never => ColorChoice::Never,
        }
    }
}

/// Expression engine selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineChoice {
    Jexl,
    Spel,
}

impl From<EngineChoice> for Engine {
    fn from(choice: EngineChoice) -> Self {
        match choice {
            EngineChoice::Jexl => Engine::Jexl,
            EngineChoice::Spel => Engine::Spel,
        }
    }
}

/// assert-that CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "assert-that")]
#[command(about = "Validate structured values against declared boolean expressions")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring (defaults to the declarations file setting, then auto)
    #[arg(long, global = true)]
    pub color: Option<ColorChoice>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available assert-that subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate JSON and JSON Lines inputs against every declared assertion
    Check {
        /// Files or directories to check (defaults to current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Declarations file
        #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Output format (defaults to the declarations file setting)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Evaluate one expression against one value
    Eval {
        /// Expression to evaluate
        expression: String,

        /// Engine the expression is written for
        #[arg(short, long, default_value = "jexl")]
        engine: EngineChoice,

        /// Value to validate, as inline JSON
        #[arg(long, conflicts_with = "file")]
        value: Option<String>,

        /// Read the value to validate from a JSON file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Property a violation is reported against
        #[arg(long)]
        property_node: Option<String>,

        /// Message reported on violation
        #[arg(short, long)]
        message: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },

    /// List all declared assertions
    List {
        /// Declarations file
        #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Output format (defaults to the declarations file setting)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
}
