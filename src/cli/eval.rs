//! Eval command implementation
//!
//! Evaluates one expression against one JSON value, read from `--value`,
//! `--file`, or stdin when neither is given.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{EXIT_ERROR, EXIT_FAULT, EXIT_SUCCESS, EXIT_VIOLATIONS};
use crate::declaration::Declaration;
use crate::engine::FacilityCatalog;
use crate::error::DeclarationError;
use crate::output::{Evaluation, HumanFormatter, JsonlFormatter};
use crate::types::Engine;
use crate::validator::{AssertThat, ValidationOutcome, ValidatorOptions};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments of the eval command
#[derive(Debug, Clone)]
pub struct EvalArgs {
    pub expression: String,
    pub engine: Engine,
    pub value: Option<String>,
    pub file: Option<PathBuf>,
    pub property_node: Option<String>,
    pub message: Option<String>,
    pub format: OutputFormat,
}

#[derive(Debug, thiserror::Error)]
enum EvalError {
    #[error("Declaration error: {0}")]
    Declaration(#[from] DeclarationError),

    #[error("Invalid JSON value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the eval command
///
/// # Returns
///
/// Exit code:
/// - 0: the value satisfies the expression
/// - 1: the value violates the expression
/// - 2: the declaration or value could not be read
/// - 3: the expression faulted
pub fn run_eval(args: &EvalArgs, color: ColorChoice) -> i32 {
    match run_eval_inner(args, color) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}

fn run_eval_inner(args: &EvalArgs, color: ColorChoice) -> Result<i32, EvalError> {
    let mut builder = Declaration::builder(args.expression.clone()).engine(args.engine);
    if let Some(message) = &args.message {
        builder = builder.message(message.clone());
    }
    if let Some(node) = &args.property_node {
        builder = builder.property_node(node.clone());
    }

    // Jexl expressions call builtins through the default namespace; the same
    // catalog serves Spel `@name` references.
    let validator = AssertThat::with_options(
        builder.build()?,
        ValidatorOptions {
            components: Some(Arc::new(FacilityCatalog::new())),
            ..ValidatorOptions::default()
        },
    );

    let value = read_value(args)?;
    let result = validator.validate_value(&value);
    let evaluation = Evaluation {
        expression: &args.expression,
        engine: args.engine,
        result: &result,
    };

    match args.format {
        OutputFormat::Human => {
            let mut out = super::common::stdout(color);
            HumanFormatter::new().write_evaluation(&mut out, &evaluation)?;
        }
        OutputFormat::Jsonl => print!("{}", JsonlFormatter::new().format_evaluation(&evaluation)),
    }

    Ok(match result {
        Ok(ValidationOutcome::Valid) => EXIT_SUCCESS,
        Ok(ValidationOutcome::Invalid(_)) => EXIT_VIOLATIONS,
        Err(_) => EXIT_FAULT,
    })
}

fn read_value(args: &EvalArgs) -> Result<Value, EvalError> {
    let text = match (&args.value, &args.file) {
        (Some(value), _) => value.clone(),
        (None, Some(file)) => std::fs::read_to_string(file)?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(expression: &str, value: &str) -> EvalArgs {
        EvalArgs {
            expression: expression.to_string(),
            engine: Engine::Jexl,
            value: Some(value.to_string()),
            file: None,
            property_node: None,
            message: None,
            format: OutputFormat::Jsonl,
        }
    }

    #[test]
    fn test_read_inline_value() {
        let value = read_value(&args("true", r#"{"age": 3}"#)).unwrap();
        assert_eq!(value, json!({"age": 3}));
    }

    #[test]
    fn test_read_value_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("value.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let mut args = args("true", "");
        args.value = None;
        args.file = Some(path);
        assert_eq!(read_value(&args).unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_exit_codes_follow_outcome() {
        assert_eq!(run_eval(&args("this.age >= 18", r#"{"age": 30}"#), ColorChoice::Never), EXIT_SUCCESS);
        assert_eq!(run_eval(&args("this.age >= 18", r#"{"age": 3}"#), ColorChoice::Never), EXIT_VIOLATIONS);
        assert_eq!(run_eval(&args("this.age / 0 == 1", r#"{"age": 3}"#), ColorChoice::Never), EXIT_FAULT);
    }

    #[test]
    fn test_bad_inputs_are_errors() {
        assert_eq!(run_eval(&args("   ", "1"), ColorChoice::Never), EXIT_ERROR);
        assert_eq!(run_eval(&args("true", "{not json"), ColorChoice::Never), EXIT_ERROR);

        let mut bad_node = args("true", "1");
        bad_node.property_node = Some("a..b".to_string());
        assert_eq!(run_eval(&bad_node, ColorChoice::Never), EXIT_ERROR);
    }
}
