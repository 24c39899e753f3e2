#![forbid(unsafe_code)]

//! assert-that: boolean-expression constraints for structured values
//!
//! A [`Declaration`] names an expression, the engine that evaluates it, the
//! message reported on failure and, optionally, the property the failure is
//! reported against. [`AssertThat`] binds a declaration to its engine once
//! and then validates any number of values, from any number of threads.
//!
//! Two engines ship with the crate, both built on the `evalexpr` evaluator: a
//! strict Jexl-style engine with function namespaces and a compiled-program
//! cache, and a Spel-style `#{...}` template engine with permissive boolean
//! coercion and `@name` component references.

pub mod cli;
pub mod config;
pub mod declaration;
pub mod engine;
pub mod error;
pub mod output;
pub mod runner;
pub mod types;
pub mod validator;

// Re-export error types for convenient access
pub use error::{
    AssertThatError, ConfigError, DeclarationError, EvaluationError, FacilityError, ValidationFault,
};

// Re-export core domain types for convenient access
pub use declaration::{Declaration, DeclarationBuilder};
pub use engine::{ComponentResolver, Facility, FacilityCatalog, FunctionTable};
pub use types::{ConstraintId, Engine, GlobPattern, PropertyPath};
pub use validator::{AssertThat, Location, ValidationOutcome, ValidatorOptions, Violation, ViolationSink};
