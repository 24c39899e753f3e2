//! Bounded cache of compiled expressions

use crate::error::EvaluationError;
use crate::engine::program::Program;
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Default number of compiled expressions kept by a Jexl engine
pub const DEFAULT_CACHE_SIZE: usize = 512;

/// LRU cache of compiled programs keyed by expression text
///
/// The lock is held for lookups and inserts only; compilation and evaluation
/// run unlocked. A capacity of zero disables caching.
pub struct ExpressionCache {
    entries: Option<Mutex<LruCache<String, Arc<Program>>>>,
}

impl ExpressionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    /// Returns the cached program for `expression`, compiling it on a miss
    pub fn get_or_compile<F>(&self, expression: &str, compile: F) -> Result<Arc<Program>, EvaluationError>
    where
        F: FnOnce(&str) -> Result<Program, EvaluationError>,
    {
        let Some(entries) = &self.entries else {
            return compile(expression).map(Arc::new);
        };

        if let Some(hit) = entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(expression)
        {
            return Ok(Arc::clone(hit));
        }

        debug!(expression, "compiling expression");
        let compiled = Arc::new(compile(expression)?);
        entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(expression.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Number of cached expressions
    pub fn len(&self) -> usize {
        self.entries
            .as_ref()
            .map_or(0, |e| e.lock().unwrap_or_else(PoisonError::into_inner).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of cached expressions; zero when caching is disabled
    pub fn capacity(&self) -> usize {
        self.entries.as_ref().map_or(0, |e| {
            e.lock().unwrap_or_else(PoisonError::into_inner).cap().get()
        })
    }
}

impl fmt::Debug for ExpressionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl Default for ExpressionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}
