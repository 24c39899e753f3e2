//! Facilities and the namespace registry
//!
//! A [`Facility`] is an opaque handle exposing named functions. Jexl
//! expressions reach facilities through namespace prefixes (`p:fn(x)`), with
//! unqualified calls (`fn(x)`) going to the default namespace.

use crate::engine::builtins::Builtins;
use crate::engine::value::from_eval;
use crate::error::{EvaluationError, FacilityError};
use evalexpr::Value as EvalValue;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// A callable target exposing named functions to expressions
pub trait Facility: Send + Sync + fmt::Debug {
    /// Invokes `function` with already-evaluated arguments
    fn call(&self, function: &str, args: &[Value]) -> Result<Value, FacilityError>;

    /// Number of arguments `function` takes, when fixed
    fn arity(&self, _function: &str) -> Option<usize> {
        None
    }
}

/// Turns the evaluator's single call argument into facility arguments
///
/// `f()` passes nothing and `f(a, b)` passes a tuple, which is spread. A
/// function of arity 1 receives its argument whole, so a list reaches
/// `len(this.tags)` intact.
pub fn spread_arguments(facility: &dyn Facility, function: &str, argument: &EvalValue) -> Vec<Value> {
    match (argument, facility.arity(function)) {
        (EvalValue::Empty, None | Some(0)) => Vec::new(),
        (EvalValue::Tuple(items), arity) if arity != Some(1) => items.iter().map(from_eval).collect(),
        (other, _) => vec![from_eval(other)],
    }
}

/// Checks that a facility function received exactly `expected` arguments
pub fn check_arity(function: &str, args: &[Value], expected: usize) -> Result<(), FacilityError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(FacilityError::Arity {
            function: function.to_string(),
            expected,
            actual: args.len(),
        })
    }
}

/// Maps a facility error onto the evaluation error for `qualified_name`
pub(crate) fn facility_failure(qualified_name: &str, error: FacilityError) -> EvaluationError {
    match error {
        FacilityError::UnknownFunction(_) => EvaluationError::UnknownFunction(qualified_name.to_string()),
        other => EvaluationError::Function {
            function: qualified_name.to_string(),
            message: other.to_string(),
        },
    }
}

type FunctionImpl = Arc<dyn Fn(&[Value]) -> Result<Value, FacilityError> + Send + Sync>;

/// A facility assembled from closures
///
/// ```
/// use assert_that::engine::{Facility, FunctionTable};
/// use serde_json::{json, Value};
///
/// let table = FunctionTable::new("math").with("double", |args: &[Value]| {
///     Ok(json!(args[0].as_i64().unwrap_or(0) * 2))
/// });
/// assert_eq!(table.call("double", &[json!(21)]).unwrap(), json!(42));
/// ```
#[derive(Clone)]
pub struct FunctionTable {
    name: String,
    functions: BTreeMap<String, FunctionImpl>,
}

impl FunctionTable {
    /// Creates an empty table; `name` is only used for diagnostics
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a function
    pub fn with<F>(mut self, function: impl Into<String>, implementation: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FacilityError> + Send + Sync + 'static,
    {
        self.functions.insert(function.into(), Arc::new(implementation));
        self
    }

    /// Names of the functions in this table, sorted
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("name", &self.name)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Facility for FunctionTable {
    fn call(&self, function: &str, args: &[Value]) -> Result<Value, FacilityError> {
        match self.functions.get(function) {
            Some(implementation) => implementation(args),
            None => Err(FacilityError::UnknownFunction(function.to_string())),
        }
    }
}

/// Resolves namespace prefixes to facilities
///
/// The default namespace (`None`) starts out bound to [`Builtins`]. Bindings
/// are applied during engine construction only; once the registry is moved
/// into an engine it is read-only.
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    entries: HashMap<Option<String>, Arc<dyn Facility>>,
}

impl NamespaceRegistry {
    /// Creates a registry with the default namespace bound to [`Builtins`]
    pub fn new() -> Self {
        let mut entries: HashMap<Option<String>, Arc<dyn Facility>> = HashMap::new();
        entries.insert(None, Arc::new(Builtins));
        Self { entries }
    }

    /// Binds `prefix` (or the default namespace for `None`) to `target`
    ///
    /// Re-registering a prefix replaces the earlier binding.
    pub fn register(&mut self, prefix: Option<&str>, target: Arc<dyn Facility>) {
        self.entries.insert(prefix.map(str::to_string), target);
    }

    /// Returns the facility bound to `prefix`
    pub fn resolve(&self, prefix: Option<&str>) -> Option<&Arc<dyn Facility>> {
        self.entries.get(&prefix.map(str::to_string))
    }

    /// Returns the registered prefixes, sorted, excluding the default namespace
    pub fn prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = self.entries.keys().filter_map(|k| k.as_deref()).collect();
        prefixes.sort_unstable();
        prefixes
    }

    /// Calls `prefix:function(argument)`, mapping failures onto evaluation errors
    pub(crate) fn call(
        &self,
        prefix: Option<&str>,
        function: &str,
        argument: &EvalValue,
    ) -> Result<Value, EvaluationError> {
        let qualified = match prefix {
            Some(prefix) => format!("{}:{}", prefix, function),
            None => function.to_string(),
        };
        let facility = self
            .resolve(prefix)
            .ok_or_else(|| EvaluationError::UnknownNamespace(prefix.unwrap_or_default().to_string()))?;
        let args = spread_arguments(&**facility, function, argument);
        facility
            .call(function, &args)
            .map_err(|e| facility_failure(&qualified, e))
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
