//! The validator: one declaration bound to one engine

use crate::declaration::Declaration;
use crate::engine::{
    ComponentResolver, DEFAULT_CACHE_SIZE, EngineSettings, ExpressionEngine, NamespaceRegistry, bind,
};
use crate::error::{EvaluationError, ValidationFault};
use crate::types::Engine;
use crate::validator::violation::{Location, ValidationOutcome, Violation, ViolationSink};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Construction options for [`AssertThat`]
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Jexl compiled-expression cache capacity; 0 disables caching
    pub cache_size: usize,
    /// Resolver for Spel `@name` component references
    pub components: Option<Arc<dyn ComponentResolver>>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            components: None,
        }
    }
}

/// Validates values against a declaration's expression
///
/// The engine is selected and configured once, at construction. A validator
/// is immutable afterwards and can be shared across threads.
///
/// ```
/// use assert_that::{AssertThat, Declaration, ValidationOutcome};
/// use serde_json::json;
///
/// let declaration = Declaration::builder("this.age >= 18 || !empty(this.parent)")
///     .property_node("age")
///     .build()
///     .unwrap();
/// let validator = AssertThat::initialize(declaration);
///
/// assert!(validator.validate_value(&json!({"age": 19, "parent": null})).unwrap().is_valid());
/// let outcome = validator.validate_value(&json!({"age": 15, "parent": null})).unwrap();
/// assert_eq!(outcome.violation().unwrap().location.to_string(), "age");
/// ```
#[derive(Debug)]
pub struct AssertThat {
    declaration: Declaration,
    engine: Box<dyn ExpressionEngine>,
}

impl AssertThat {
    /// Binds a declaration with default options
    pub fn initialize(declaration: Declaration) -> Self {
        Self::with_options(declaration, ValidatorOptions::default())
    }

    /// Binds a declaration, selecting and configuring its engine
    pub fn with_options(declaration: Declaration, options: ValidatorOptions) -> Self {
        let mut namespaces = NamespaceRegistry::new();
        match declaration.engine() {
            Engine::Jexl => {
                for binding in declaration.namespaces() {
                    namespaces.register(binding.prefix.as_deref(), Arc::clone(&binding.target));
                }
            }
            Engine::Spel if !declaration.namespaces().is_empty() => {
                warn!(
                    expression = declaration.expression(),
                    count = declaration.namespaces().len(),
                    "namespaces are not supported by the spel engine and are ignored"
                );
            }
            Engine::Spel => {}
        }

        let engine = bind(
            declaration.engine(),
            EngineSettings {
                cache_size: options.cache_size,
                namespaces,
                components: options.components,
            },
        );

        Self {
            declaration,
            engine,
        }
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// The engine this validator is bound to
    pub fn engine(&self) -> Engine {
        self.engine.kind()
    }

    /// Validates a JSON value
    pub fn validate_value(&self, value: &Value) -> Result<ValidationOutcome, ValidationFault> {
        match self.engine.evaluate(self.declaration.expression(), value) {
            Ok(true) => Ok(ValidationOutcome::Valid),
            Ok(false) => Ok(ValidationOutcome::Invalid(self.violation())),
            Err(source) => Err(self.fault(value.to_string(), source)),
        }
    }

    /// Validates any serializable value
    pub fn validate_serialize<T: Serialize + ?Sized>(
        &self,
        target: &T,
    ) -> Result<ValidationOutcome, ValidationFault> {
        let value = serde_json::to_value(target)
            .map_err(|e| self.fault(std::any::type_name::<T>().to_string(), EvaluationError::from(e)))?;
        self.validate_value(&value)
    }

    /// Validates a value, reporting any violation to `sink`
    pub fn is_valid(&self, value: &Value, sink: &mut dyn ViolationSink) -> Result<bool, ValidationFault> {
        match self.validate_value(value)? {
            ValidationOutcome::Valid => Ok(true),
            ValidationOutcome::Invalid(violation) => {
                sink.report(violation);
                Ok(false)
            }
        }
    }

    fn violation(&self) -> Violation {
        Violation {
            message: self.declaration.message().to_string(),
            location: match self.declaration.property_node() {
                Some(path) => Location::Property(path.clone()),
                None => Location::Root,
            },
        }
    }

    fn fault(&self, value: String, source: EvaluationError) -> ValidationFault {
        ValidationFault {
            value,
            expression: self.declaration.expression().to_string(),
            source,
        }
    }
}
