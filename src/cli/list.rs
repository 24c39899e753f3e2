//! List command implementation
//!
//! This module implements the `assert-that list` command, which binds every
//! declared assertion and shows its ID, engine, expression and property node.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{EXIT_ERROR, EXIT_SUCCESS};
use crate::error::{ConfigError, DeclarationError};
use crate::output::{HumanFormatter, JsonlFormatter};
use std::path::Path;

/// Error type specific to list command
#[derive(Debug, thiserror::Error)]
enum ListError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Declaration error: {0}")]
    Declaration(#[from] DeclarationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the list command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error
pub fn run_list(config_path: &Path, format: Option<OutputFormat>, color: Option<ColorChoice>) -> i32 {
    match run_list_inner(config_path, format, color) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}

fn run_list_inner(
    config_path: &Path,
    format: Option<OutputFormat>,
    color: Option<ColorChoice>,
) -> Result<(), ListError> {
    let config = super::common::load_config(config_path)?;
    let format = format.unwrap_or_else(|| config.output.format.into());
    let color = color.unwrap_or_else(|| config.output.color.into());

    // Binding every assertion surfaces unknown facilities before listing
    let registry = super::common::build_registry(&config)?;

    match format {
        OutputFormat::Human => {
            let mut out = super::common::stdout(color);
            HumanFormatter::new().write_constraints(&mut out, &registry)?;
        }
        OutputFormat::Jsonl => print!("{}", JsonlFormatter::new().format_constraints(&registry)),
    }
    Ok(())
}
