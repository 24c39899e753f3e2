//! Jexl engine: strict expressions with compiled-program caching and namespaces
//!
//! Expressions use the `evalexpr` grammar. The subject is `this`, members are
//! read with dotted paths (`this.address.city`, `this.tags.0`) and `null`
//! is the null value. Calls go through the namespace registry: `fn(x)` to the
//! default namespace and `p:fn(x)` to the facility bound to `p`.

use crate::engine::ExpressionEngine;
use crate::engine::cache::{DEFAULT_CACHE_SIZE, ExpressionCache};
use crate::engine::context::{Environment, JexlContext};
use crate::engine::namespace::NamespaceRegistry;
use crate::engine::program::Program;
use crate::engine::value::{from_eval, type_name};
use crate::error::EvaluationError;
use crate::types::Engine;
use evalexpr::Value as EvalValue;
use serde_json::Value;
use tracing::warn;

/// Evaluates Jexl expressions
///
/// Built through [`JexlEngine::builder`]. The validator always builds with
/// `strict(true).silent(false)`.
#[derive(Debug)]
pub struct JexlEngine {
    cache: ExpressionCache,
    strict: bool,
    silent: bool,
    namespaces: NamespaceRegistry,
}

/// Options for a [`JexlEngine`]
#[derive(Debug, Clone)]
pub struct JexlEngineBuilder {
    cache: usize,
    strict: bool,
    silent: bool,
    namespaces: NamespaceRegistry,
}

impl Default for JexlEngineBuilder {
    fn default() -> Self {
        Self {
            cache: DEFAULT_CACHE_SIZE,
            strict: false,
            silent: false,
            namespaces: NamespaceRegistry::new(),
        }
    }
}

impl JexlEngineBuilder {
    /// Capacity of the compiled-expression cache; 0 disables caching
    pub fn cache(mut self, capacity: usize) -> Self {
        self.cache = capacity;
        self
    }

    /// Strict mode: unresolved names are errors instead of null
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Silent mode: evaluation errors are logged and yield `null`
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn namespaces(mut self, namespaces: NamespaceRegistry) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn build(self) -> JexlEngine {
        JexlEngine {
            cache: ExpressionCache::new(self.cache),
            strict: self.strict,
            silent: self.silent,
            namespaces: self.namespaces,
        }
    }
}

impl JexlEngine {
    pub fn builder() -> JexlEngineBuilder {
        JexlEngineBuilder::default()
    }

    /// The compiled-expression cache
    pub fn cache(&self) -> &ExpressionCache {
        &self.cache
    }

    /// Evaluates `expression` with `this` bound to `subject`, returning the raw value
    pub fn evaluate_value(&self, expression: &str, subject: &Value) -> Result<Value, EvaluationError> {
        let result = self
            .cache
            .get_or_compile(expression, |source| Program::compile(source, source, 0))
            .and_then(|program| self.run(&program, subject));

        match result {
            Err(error) if self.silent => {
                warn!(expression, %error, "ignoring evaluation error in silent mode");
                Ok(Value::Null)
            }
            other => other,
        }
    }

    fn run(&self, program: &Program, subject: &Value) -> Result<Value, EvaluationError> {
        let context = JexlContext::for_subject(subject);
        let environment = Environment::bind(
            program.variables(),
            |path| context.resolve(path),
            !self.strict,
            |identifier, argument| self.call(identifier, argument),
        );
        match program.execute(&environment) {
            Ok(value) => Ok(from_eval(&value)),
            Err(error) => Err(environment.into_error(error)),
        }
    }

    /// Dispatches `p:fn` and `fn` calls to the namespace registry
    fn call(&self, identifier: &str, argument: &EvalValue) -> Result<Value, EvaluationError> {
        match identifier.split_once(':') {
            Some((prefix, function)) => self.namespaces.call(Some(prefix), function, argument),
            None => self.namespaces.call(None, identifier, argument),
        }
    }
}

impl ExpressionEngine for JexlEngine {
    fn kind(&self) -> Engine {
        Engine::Jexl
    }

    fn evaluate(&self, expression: &str, subject: &Value) -> Result<bool, EvaluationError> {
        match self.evaluate_value(expression, subject)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvaluationError::NotBoolean {
                expression: expression.to_string(),
                actual: type_name(&other),
            }),
        }
    }
}
