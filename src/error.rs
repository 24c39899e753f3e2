//! Error types for assert-that
//!
//! This module defines the error types used throughout the crate, following
//! a hierarchical structure with specific error variants for different
//! error categories.
//!
//! Two error classes never mix: a value that cleanly fails its expression is
//! a [`crate::validator::ValidationOutcome::Invalid`], while anything that
//! prevents a clean boolean result is an [`EvaluationError`], surfaced by the
//! validator as a [`ValidationFault`].

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML syntax or schema
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but is semantically invalid
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Errors raised while binding a declaration to a validator
#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    /// The expression text is empty or whitespace
    #[error("Expression must not be empty")]
    EmptyExpression,

    /// The property node is not a valid property path
    #[error("Invalid property node: {0}")]
    InvalidPropertyPath(String),

    /// A namespace target names a facility the catalog does not know
    #[error("Unknown facility '{target}' for namespace '{prefix}'")]
    UnknownFacility { prefix: String, target: String },

    /// Two declarations share the same ID
    #[error("Duplicate constraint ID '{0}'")]
    DuplicateId(String),

    /// The declaration ID is not a valid constraint ID
    #[error("Invalid constraint ID: {0}")]
    InvalidId(String),
}

/// Errors returned by a facility function
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FacilityError {
    /// The facility has no function with this name
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    /// The function was called with the wrong number of arguments
    #[error("{function}() expects {expected} argument(s), got {actual}")]
    Arity {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// An argument has the wrong type or an unparseable value
    #[error("{function}(): {message}")]
    InvalidArgument { function: String, message: String },
}

/// Errors raised while parsing or evaluating an expression
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// The expression (or template) could not be parsed
    #[error("Failed to parse expression '{expression}' at offset {position}: {message}")]
    Parse {
        expression: String,
        position: usize,
        message: String,
    },

    /// A variable is not bound in the evaluation context
    #[error("Unresolved variable '{0}'")]
    UnresolvedVariable(String),

    /// A property does not exist on the target value
    #[error("Unresolved property '{property}' on {target}")]
    UnresolvedProperty {
        property: String,
        target: &'static str,
    },

    /// A namespace prefix is not registered
    #[error("Unknown namespace '{0}'")]
    UnknownNamespace(String),

    /// A function is not provided by the resolved facility
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    /// A component reference could not be resolved
    #[error("Unknown component '@{0}'")]
    UnknownComponent(String),

    /// A facility function rejected its arguments or failed
    #[error("Function '{function}' failed: {message}")]
    Function { function: String, message: String },

    /// A strict engine produced something other than a boolean
    #[error("The expression [{expression}] should evaluate to boolean, but was '{actual}'")]
    NotBoolean {
        expression: String,
        actual: &'static str,
    },

    /// A permissive engine could not coerce its result to a boolean
    #[error("Cannot convert {actual} value {value} to boolean")]
    NotConvertible { actual: &'static str, value: String },

    /// The evaluator rejected an operation, such as arithmetic on a string
    #[error("{0}")]
    Evaluator(#[from] evalexpr::EvalexprError),

    /// The target value could not be converted to an evaluation subject
    #[error("Cannot convert subject to a value: {0}")]
    Subject(#[from] serde_json::Error),
}

/// A fatal failure to validate a value
///
/// Raised when the bound expression cannot produce a clean boolean for the
/// value. It signals a misconfigured expression, not a failed business rule.
#[derive(Debug, thiserror::Error)]
#[error("Failed to validate [{value}] by expression '{expression}'")]
pub struct ValidationFault {
    /// The value being validated, rendered as JSON
    pub value: String,
    /// The expression text of the declaration
    pub expression: String,
    /// The underlying evaluation error
    #[source]
    pub source: EvaluationError,
}

/// Top-level error type for assert-that
#[derive(Debug, thiserror::Error)]
pub enum AssertThatError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Declaration error
    #[error("Declaration error: {0}")]
    Declaration(#[from] DeclarationError),

    /// Evaluation fault
    #[error(transparent)]
    Fault(#[from] ValidationFault),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
