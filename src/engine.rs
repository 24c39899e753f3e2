//! Expression engines and the facilities they call into
//!
//! Both engines compile expressions with the `evalexpr` evaluator and differ
//! in how they resolve names, dispatch calls and interpret the result.

pub mod builtins;
pub mod cache;
pub mod catalog;
pub mod context;
pub mod jexl;
pub mod namespace;
pub mod program;
pub mod spel;
pub mod value;

pub use builtins::Builtins;
pub use cache::{DEFAULT_CACHE_SIZE, ExpressionCache};
pub use catalog::{ComponentResolver, FacilityCatalog};
pub use jexl::{JexlEngine, JexlEngineBuilder};
pub use namespace::{Facility, FunctionTable, NamespaceRegistry, check_arity};
pub use program::Program;
pub use spel::SpelEngine;

use crate::error::EvaluationError;
use crate::types::Engine;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Uniform interface over the expression engines
pub trait ExpressionEngine: Send + Sync + fmt::Debug {
    /// Which engine this is
    fn kind(&self) -> Engine;

    /// Evaluates `expression` with `this` bound to `subject`
    ///
    /// Returns the boolean outcome; any failure to produce one is an error,
    /// never `false`.
    fn evaluate(&self, expression: &str, subject: &Value) -> Result<bool, EvaluationError>;
}

/// Settings applied when binding an engine
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Jexl compiled-expression cache capacity
    pub cache_size: usize,
    /// Jexl namespace bindings
    pub namespaces: NamespaceRegistry,
    /// Spel component resolver
    pub components: Option<Arc<dyn ComponentResolver>>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            namespaces: NamespaceRegistry::new(),
            components: None,
        }
    }
}

/// Builds the engine selected by `engine`
///
/// Jexl is always strict and non-silent here.
pub fn bind(engine: Engine, settings: EngineSettings) -> Box<dyn ExpressionEngine> {
    debug!(%engine, cache_size = settings.cache_size, "binding expression engine");
    match engine {
        Engine::Jexl => Box::new(
            JexlEngine::builder()
                .cache(settings.cache_size)
                .strict(true)
                .silent(false)
                .namespaces(settings.namespaces)
                .build(),
        ),
        Engine::Spel => Box::new(match settings.components {
            Some(components) => SpelEngine::with_components(components),
            None => SpelEngine::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bind_selects_engine() {
        for engine in Engine::all() {
            assert_eq!(bind(engine, EngineSettings::default()).kind(), engine);
        }
    }

    #[test]
    fn test_bound_jexl_is_strict() {
        let engine = bind(Engine::Jexl, EngineSettings::default());
        assert!(engine.evaluate("this.missing == null", &json!({})).is_err());
    }

    #[test]
    fn test_bound_spel_uses_components() {
        let settings = EngineSettings {
            components: Some(Arc::new(FacilityCatalog::new())),
            ..EngineSettings::default()
        };
        let engine = bind(Engine::Spel, settings);
        assert!(engine.evaluate("#{@builtins.isBlank(this)}", &json!(" ")).unwrap());
    }
}
