#![forbid(unsafe_code)]

//! Core domain types for assert-that
//!
//! This module defines the small value types shared by declarations, engines,
//! the validator and the batch runner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression engines a declaration can select
///
/// The engine is resolved once, when a declaration is bound to a validator,
/// and never revisited per evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Strict dialect with compiled-expression caching and function namespaces
    #[default]
    Jexl,
    /// Template dialect (`#{...}`) with permissive boolean coercion and component references
    Spel,
}

impl Engine {
    /// Returns all engines in declaration order
    pub fn all() -> [Engine; 2] {
        [Engine::Jexl, Engine::Spel]
    }

    /// Returns the lowercase name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Jexl => "jexl",
            Engine::Spel => "spel",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated constraint identifier
///
/// Constraint IDs must be non-empty and contain only alphanumeric characters, hyphens, and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConstraintId(String);

impl ConstraintId {
    /// Creates a new ConstraintId, validating the input
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            return None;
        }
        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        Some(ConstraintId(id))
    }

    /// Returns the constraint ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ConstraintId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ConstraintId::new(value.clone()).ok_or_else(|| format!("Invalid constraint ID '{}'", value))
    }
}

impl From<ConstraintId> for String {
    fn from(id: ConstraintId) -> Self {
        id.0
    }
}

/// A property path a violation can be relocated to
///
/// Paths are dot-separated field names such as `age` or `address.city`.
/// Surrounding whitespace is trimmed; empty paths and empty segments are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyPath(String);

impl PropertyPath {
    /// Creates a new PropertyPath, validating the input
    ///
    /// Returns None if the path is empty or has an empty segment (`a..b`, `.a`, `a.`).
    pub fn new(path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        let trimmed = path.trim();
        if trimmed.is_empty() || trimmed.split('.').any(|segment| segment.trim().is_empty()) {
            return None;
        }
        Some(PropertyPath(trimmed.to_string()))
    }

    /// Parses an optional property node as written in a declaration
    ///
    /// Only the empty string means "no relocation"; a whitespace-only node is
    /// an invalid path.
    pub fn parse_node(node: &str) -> Result<Option<Self>, String> {
        if node.is_empty() {
            return Ok(None);
        }
        PropertyPath::new(node)
            .map(Some)
            .ok_or_else(|| format!("Invalid property path '{}'", node))
    }

    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the dot-separated segments of the path
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PropertyPath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PropertyPath::new(value.clone()).ok_or_else(|| format!("Invalid property path '{}'", value))
    }
}

impl From<PropertyPath> for String {
    fn from(path: PropertyPath) -> Self {
        path.0
    }
}

/// A glob pattern for input file matching
///
/// This is a simple wrapper around a string that will be used with the `globset` crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobPattern(String);

impl GlobPattern {
    /// Creates a new GlobPattern
    pub fn new(pattern: impl Into<String>) -> Self {
        GlobPattern(pattern.into())
    }

    /// Returns the pattern as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GlobPattern {
    fn from(pattern: &str) -> Self {
        GlobPattern(pattern.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_id_validation() {
        assert!(ConstraintId::new("adult-or-guardian").is_some());
        assert!(ConstraintId::new("grade_above_b").is_some());
        assert!(ConstraintId::new("").is_none());
        assert!(ConstraintId::new("has space").is_none());
        assert!(ConstraintId::new("bad@id").is_none());
    }

    #[test]
    fn test_constraint_id_deserialize_rejects_invalid() {
        let ok: Result<ConstraintId, _> = serde_json::from_str("\"valid-id\"");
        assert!(ok.is_ok());

        let bad: Result<ConstraintId, _> = serde_json::from_str("\"not valid\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_property_path_validation() {
        assert_eq!(PropertyPath::new("age").unwrap().as_str(), "age");
        assert_eq!(PropertyPath::new(" address.city ").unwrap().as_str(), "address.city");
        assert!(PropertyPath::new("").is_none());
        assert!(PropertyPath::new("   ").is_none());
        assert!(PropertyPath::new("a..b").is_none());
        assert!(PropertyPath::new(".a").is_none());
        assert!(PropertyPath::new("a.").is_none());
    }

    #[test]
    fn test_property_path_parse_node() {
        assert_eq!(PropertyPath::parse_node("").unwrap(), None);
        assert!(PropertyPath::parse_node("  ").is_err());
        assert_eq!(
            PropertyPath::parse_node("age").unwrap(),
            Some(PropertyPath::new("age").unwrap())
        );
        assert!(PropertyPath::parse_node("a..b").is_err());
    }

    #[test]
    fn test_property_path_segments() {
        let path = PropertyPath::new("address.city.zip").unwrap();
        let segments: Vec<&str> = path.segments().collect();
        assert_eq!(segments, vec!["address", "city", "zip"]);
    }

    #[test]
    fn test_engine_serialization() {
        assert_eq!(serde_json::to_string(&Engine::Jexl).unwrap(), "\"jexl\"");
        assert_eq!(serde_json::to_string(&Engine::Spel).unwrap(), "\"spel\"");
        let engine: Engine = serde_json::from_str("\"spel\"").unwrap();
        assert_eq!(engine, Engine::Spel);
    }

    #[test]
    fn test_engine_default_is_jexl() {
        assert_eq!(Engine::default(), Engine::Jexl);
        assert_eq!(Engine::all(), [Engine::Jexl, Engine::Spel]);
        assert_eq!(Engine::Spel.to_string(), "spel");
    }

    #[test]
    fn test_glob_pattern() {
        let pattern = GlobPattern::new("**/*.json");
        assert_eq!(pattern.as_str(), "**/*.json");
        assert_eq!(GlobPattern::from("*.jsonl").to_string(), "*.jsonl");
    }
}
