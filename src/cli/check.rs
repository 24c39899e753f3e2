//! Check command implementation
//!
//! This module implements the `assert-that check` command, which:
//! - Loads the declarations file
//! - Binds a validator per declared assertion
//! - Discovers and loads JSON / JSON Lines inputs
//! - Validates every document against every assertion in parallel
//! - Formats output (human or JSONL)
//! - Returns the exit code

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{EXIT_ERROR, EXIT_FAULT, EXIT_SUCCESS, EXIT_VIOLATIONS};
use crate::error::{ConfigError, DeclarationError};
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::runner::{InputError, RunResult, ValidationRunner};
use std::path::{Path, PathBuf};

/// Error type specific to check command
#[derive(Debug, thiserror::Error)]
pub(crate) enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Declaration error: {0}")]
    Declaration(#[from] DeclarationError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the check command
///
/// # Returns
///
/// Exit code:
/// - 0: every document satisfied every assertion
/// - 1: one or more violations
/// - 2: configuration, declaration or input error
/// - 3: one or more evaluation faults
pub fn run_check(
    paths: &[PathBuf],
    config_path: &Path,
    format: Option<OutputFormat>,
    color: Option<ColorChoice>,
) -> i32 {
    match run_check_inner(paths, config_path, format, color) {
        Ok(result) => exit_code(&result),
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}

/// Faults outrank violations: a fault means an assertion is broken
fn exit_code(result: &RunResult) -> i32 {
    if !result.faults.is_empty() {
        EXIT_FAULT
    } else if !result.reports.is_empty() {
        EXIT_VIOLATIONS
    } else {
        EXIT_SUCCESS
    }
}

fn run_check_inner(
    paths: &[PathBuf],
    config_path: &Path,
    format: Option<OutputFormat>,
    color: Option<ColorChoice>,
) -> Result<RunResult, CheckError> {
    let config = super::common::load_config(config_path)?;
    let format = format.unwrap_or_else(|| config.output.format.into());
    let color = color.unwrap_or_else(|| config.output.color.into());

    let registry = super::common::build_registry(&config)?;
    if registry.is_empty() {
        eprintln!("Warning: No assertions are declared. Nothing to check.");
    }

    let documents = super::common::load_inputs(paths, &config)?;
    if documents.is_empty() {
        eprintln!("Warning: No documents found to check.");
    }

    if format == OutputFormat::Human {
        eprintln!(
            "Checking {} document(s) with {} assertion(s)...",
            documents.len(),
            registry.len()
        );
    }

    let runner = ValidationRunner::new(registry);
    let result = runner.run(&documents);

    match format {
        OutputFormat::Human => {
            let mut out = super::common::stdout(color);
            HumanFormatter::new().write_run(&mut out, &result)?;
        }
        OutputFormat::Jsonl => print!("{}", JsonlFormatter::new().format_run(&result)),
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EvaluationError, ValidationFault};
    use crate::runner::{FaultReport, Report};
    use crate::types::ConstraintId;
    use crate::validator::{Location, Violation};

    fn report() -> Report {
        Report {
            constraint: ConstraintId::new("a").unwrap(),
            source: PathBuf::from("x.json"),
            line: None,
            violation: Violation {
                message: "m".to_string(),
                location: Location::Root,
            },
        }
    }

    fn fault() -> FaultReport {
        FaultReport {
            constraint: ConstraintId::new("a").unwrap(),
            source: PathBuf::from("x.json"),
            line: None,
            fault: ValidationFault {
                value: "1".to_string(),
                expression: "this.a".to_string(),
                source: EvaluationError::UnresolvedVariable("a".to_string()),
            },
        }
    }

    #[test]
    fn test_exit_code_clean() {
        assert_eq!(exit_code(&RunResult::default()), EXIT_SUCCESS);
    }

    #[test]
    fn test_exit_code_violations() {
        let result = RunResult {
            reports: vec![report()],
            ..RunResult::default()
        };
        assert_eq!(exit_code(&result), EXIT_VIOLATIONS);
    }

    #[test]
    fn test_exit_code_fault_wins() {
        let result = RunResult {
            reports: vec![report()],
            faults: vec![fault()],
            ..RunResult::default()
        };
        assert_eq!(exit_code(&result), EXIT_FAULT);
    }

    #[test]
    fn test_check_error_display() {
        let err = CheckError::Declaration(DeclarationError::DuplicateId("a".to_string()));
        assert_eq!(err.to_string(), "Declaration error: Duplicate constraint ID 'a'");
    }
}
