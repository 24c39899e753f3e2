//! Per-evaluation binding environments
//!
//! Contexts borrow the subject; building one allocates no copies of it and
//! has no side effects. An [`Environment`] is what the evaluator actually
//! sees: the variable paths a program reads, resolved against a context, and
//! a function dispatcher.

use crate::engine::catalog::ComponentResolver;
use crate::engine::value::{to_eval, type_name};
use crate::error::EvaluationError;
use evalexpr::{Context, EvalexprError, EvalexprResult, Value as EvalValue};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// Name the subject is bound under in both dialects
pub const SUBJECT: &str = "this";

/// Identifier read as the null value
pub const NULL: &str = "null";

/// Follows one path segment: an object key, or an index into an array
fn step<'v>(target: &'v Value, segment: &str) -> Result<&'v Value, EvaluationError> {
    let found = match target {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    };
    found.ok_or_else(|| EvaluationError::UnresolvedProperty {
        property: segment.to_string(),
        target: type_name(target),
    })
}

/// Flat variable map for Jexl evaluation
#[derive(Debug, Clone)]
pub struct JexlContext<'a> {
    variables: HashMap<&'static str, &'a Value>,
}

impl<'a> JexlContext<'a> {
    /// Binds `this` to the subject
    pub fn for_subject(subject: &'a Value) -> Self {
        let mut variables = HashMap::with_capacity(1);
        variables.insert(SUBJECT, subject);
        Self { variables }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.variables.get(name).copied()
    }

    /// Resolves a dotted path such as `this.address.city`
    pub fn resolve(&self, path: &str) -> Result<&'a Value, EvaluationError> {
        let mut segments = path.split('.');
        let root = segments.next().unwrap_or_default();
        let mut current = self
            .get(root)
            .ok_or_else(|| EvaluationError::UnresolvedVariable(root.to_string()))?;
        for segment in segments {
            current = step(current, segment)?;
        }
        Ok(current)
    }
}

/// Root object of a Spel evaluation, exposing the subject as property `this`
#[derive(Debug, Clone, Copy)]
pub struct ThisWrapper<'a> {
    this: &'a Value,
}

impl<'a> ThisWrapper<'a> {
    pub fn new(this: &'a Value) -> Self {
        Self { this }
    }

    /// Reads a property of the root; only `this` exists
    pub fn property(&self, name: &str) -> Option<&'a Value> {
        (name == SUBJECT).then_some(self.this)
    }
}

/// Reads named properties off values during Spel evaluation
pub trait PropertyAccessor: Send + Sync + std::fmt::Debug {
    /// Returns the property, or `None` when this accessor cannot read it
    fn read<'v>(&self, target: &'v Value, name: &str) -> Option<&'v Value>;
}

/// Exposes object keys as named properties
#[derive(Debug, Clone, Copy, Default)]
pub struct MapAccessor;

impl PropertyAccessor for MapAccessor {
    fn read<'v>(&self, target: &'v Value, name: &str) -> Option<&'v Value> {
        target.as_object().and_then(|map| map.get(name))
    }
}

static MAP_ACCESSOR: MapAccessor = MapAccessor;

/// Binding environment for Spel evaluation
#[derive(Debug)]
pub struct SpelContext<'a> {
    root: ThisWrapper<'a>,
    accessors: Vec<&'static dyn PropertyAccessor>,
    components: Option<&'a dyn ComponentResolver>,
}

impl<'a> SpelContext<'a> {
    /// Wraps the subject and installs the component resolver, when given
    pub fn for_subject(subject: &'a Value, components: Option<&'a dyn ComponentResolver>) -> Self {
        Self {
            root: ThisWrapper::new(subject),
            accessors: vec![&MAP_ACCESSOR as &dyn PropertyAccessor],
            components,
        }
    }

    pub fn root(&self) -> ThisWrapper<'a> {
        self.root
    }

    /// Reads `name` from `target` through the first accessor that can
    pub fn read_property<'v>(&self, target: &'v Value, name: &str) -> Option<&'v Value> {
        self.accessors
            .iter()
            .find_map(|accessor| accessor.read(target, name))
    }

    /// Resolves a dotted path; the first segment is a property of the root
    pub fn resolve(&self, path: &str) -> Result<&'a Value, EvaluationError> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let mut current = self
            .root
            .property(first)
            .ok_or_else(|| EvaluationError::UnresolvedProperty {
                property: first.to_string(),
                target: "root object",
            })?;
        for segment in segments {
            current = self.read_property(current, segment).ok_or_else(|| {
                EvaluationError::UnresolvedProperty {
                    property: segment.to_string(),
                    target: type_name(current),
                }
            })?;
        }
        Ok(current)
    }

    pub fn components(&self) -> Option<&'a dyn ComponentResolver> {
        self.components
    }
}

/// The evaluator's view of one evaluation
///
/// Holds the resolved variables a program reads and a dispatcher for its
/// function calls. Builtin evaluator functions are disabled; every call goes
/// through the dispatcher. Typed errors raised while resolving or calling are
/// kept so they survive the trip through the evaluator.
pub struct Environment<F> {
    values: HashMap<String, EvalValue>,
    unresolved: HashMap<String, EvaluationError>,
    functions: F,
    failure: RefCell<Option<EvaluationError>>,
}

impl<F> Environment<F>
where
    F: Fn(&str, &EvalValue) -> Result<Value, EvaluationError>,
{
    /// Resolves `variables` through `resolve`
    ///
    /// With `lenient` set, unresolvable names read as null; otherwise reading
    /// one fails with its resolution error.
    pub fn bind<'v, R>(variables: &[String], resolve: R, lenient: bool, functions: F) -> Self
    where
        R: Fn(&str) -> Result<&'v Value, EvaluationError>,
    {
        let mut values = HashMap::with_capacity(variables.len());
        let mut unresolved = HashMap::new();
        for name in variables {
            if name == NULL {
                values.insert(name.clone(), EvalValue::Empty);
                continue;
            }
            match resolve(name) {
                Ok(value) => {
                    values.insert(name.clone(), to_eval(value));
                }
                Err(_) if lenient => {
                    values.insert(name.clone(), EvalValue::Empty);
                }
                Err(error) => {
                    unresolved.insert(name.clone(), error);
                }
            }
        }

        Self {
            values,
            unresolved,
            functions,
            failure: RefCell::new(None),
        }
    }

    /// Recovers the typed error behind an evaluator failure
    pub fn into_error(mut self, error: EvalexprError) -> EvaluationError {
        if let Some(failure) = self.failure.into_inner() {
            return failure;
        }
        match error {
            EvalexprError::VariableIdentifierNotFound(name) => self
                .unresolved
                .remove(&name)
                .unwrap_or(EvaluationError::UnresolvedVariable(name)),
            EvalexprError::FunctionIdentifierNotFound(name) => EvaluationError::UnknownFunction(name),
            other => EvaluationError::Evaluator(other),
        }
    }
}

impl<F> Context for Environment<F>
where
    F: Fn(&str, &EvalValue) -> Result<Value, EvaluationError>,
{
    fn get_value(&self, identifier: &str) -> Option<&EvalValue> {
        self.values.get(identifier)
    }

    fn call_function(&self, identifier: &str, argument: &EvalValue) -> EvalexprResult<EvalValue> {
        match (self.functions)(identifier, argument) {
            Ok(value) => Ok(to_eval(&value)),
            Err(error) => {
                let message = error.to_string();
                let mut failure = self.failure.borrow_mut();
                if failure.is_none() {
                    *failure = Some(error);
                }
                Err(EvalexprError::CustomMessage(message))
            }
        }
    }

    fn are_builtin_functions_disabled(&self) -> bool {
        true
    }

    fn set_builtin_functions_disabled(&mut self, disabled: bool) -> EvalexprResult<()> {
        if disabled {
            Ok(())
        } else {
            Err(EvalexprError::CustomMessage(
                "builtin functions cannot be enabled".to_string(),
            ))
        }
    }
}
