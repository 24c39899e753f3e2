//! Common helper functions shared across CLI commands
//!
//! This module provides shared functionality for loading the declarations
//! file, building the constraint registry, discovering inputs and picking
//! the output stream.

use crate::cli::args::ColorChoice;
use crate::config::Config;
use crate::engine::FacilityCatalog;
use crate::error::{ConfigError, DeclarationError};
use crate::runner::{Document, InputError, discover_inputs, load_documents};
use crate::validator::ConstraintRegistry;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use termcolor::StandardStream;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_VIOLATIONS: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_FAULT: i32 = 3;

/// Load the declarations file
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file does not exist or cannot be read.
/// Returns `ConfigError::Parse` or `ConfigError::Validation` if it is invalid.
pub(crate) fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )));
    }

    Config::load(path)
}

/// Build the constraint registry from configuration
///
/// The default facility catalog serves both TOML namespace targets and
/// Spel `@name` component references.
pub(crate) fn build_registry(config: &Config) -> Result<ConstraintRegistry, DeclarationError> {
    let catalog = FacilityCatalog::new();
    let components = Arc::new(catalog.clone());
    ConstraintRegistry::from_config(config, &catalog, Some(components))
}

/// Discover inputs under `paths` and load their documents
pub(crate) fn load_inputs(paths: &[PathBuf], config: &Config) -> Result<Vec<Document>, InputError> {
    let inputs = discover_inputs(paths, &config.inputs.include, &config.inputs.exclude)?;
    let mut documents = Vec::new();
    for input in &inputs {
        documents.extend(load_documents(input)?);
    }
    Ok(documents)
}

/// Opens stdout with the requested coloring
///
/// `auto` only colors when stdout is a terminal.
pub(crate) fn stdout(color: ColorChoice) -> StandardStream {
    let choice = match color {
        ColorChoice::Always => termcolor::ColorChoice::Always,
        ColorChoice::Never => termcolor::ColorChoice::Never,
        ColorChoice::Auto if std::io::stdout().is_terminal() => termcolor::ColorChoice::Auto,
        ColorChoice::Auto => termcolor::ColorChoice::Never,
    };
    StandardStream::stdout(choice)
}
