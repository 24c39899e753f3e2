//! Parsing and validation for assertions.toml declaration files

use crate::engine::DEFAULT_CACHE_SIZE;
use crate::error::ConfigError;
use crate::types::{ConstraintId, Engine, GlobPattern, PropertyPath};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default name of the declarations file
pub const DEFAULT_CONFIG_FILE: &str = "assertions.toml";

/// Main configuration struct for assertions.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Engine settings
    #[serde(default)]
    pub settings: Settings,

    /// Input discovery
    #[serde(default)]
    pub inputs: InputsConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Declarations, in file order
    #[serde(default, rename = "assert")]
    pub assertions: Vec<AssertionConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        // Validate glob patterns by attempting to compile them with globset
        for pattern in &self.inputs.include {
            globset::Glob::new(pattern.as_str()).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid include glob pattern '{}': {}",
                    pattern.as_str(),
                    e
                ))
            })?;
        }

        for pattern in &self.inputs.exclude {
            globset::Glob::new(pattern.as_str()).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid exclude glob pattern '{}': {}",
                    pattern.as_str(),
                    e
                ))
            })?;
        }

        let mut seen = HashSet::new();
        for assertion in &self.assertions {
            if !seen.insert(&assertion.id) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate assertion id '{}'",
                    assertion.id
                )));
            }

            if assertion.expression.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Assertion '{}' has an empty expression",
                    assertion.id
                )));
            }

            if let Some(node) = &assertion.property_node {
                PropertyPath::parse_node(node).map_err(|e| {
                    ConfigError::Validation(format!("Assertion '{}': {}", assertion.id, e))
                })?;
            }

            for namespace in &assertion.namespaces {
                if namespace.prefix.as_deref().is_some_and(|p| p.trim().is_empty()) {
                    return Err(ConfigError::Validation(format!(
                        "Assertion '{}' has an empty namespace prefix; omit the prefix to bind the default namespace",
                        assertion.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Looks up a declaration by id
    pub fn assertion(&self, id: &ConstraintId) -> Option<&AssertionConfig> {
        self.assertions.iter().find(|a| &a.id == id)
    }
}

/// `[settings]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Jexl compiled-expression cache capacity; 0 disables caching
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

fn default_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

/// `[inputs]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Input patterns to include
    #[serde(default = "default_include")]
    pub include: Vec<GlobPattern>,

    /// Input patterns to exclude
    #[serde(default)]
    pub exclude: Vec<GlobPattern>,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: Vec::new(),
        }
    }
}

fn default_include() -> Vec<GlobPattern> {
    vec![GlobPattern::new("**/*.json"), GlobPattern::new("**/*.jsonl")]
}

/// One `[[assert]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssertionConfig {
    pub id: ConstraintId,

    pub expression: String,

    #[serde(default)]
    pub engine: Engine,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_node: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<NamespaceConfig>,
}

/// A namespace binding; `target` names a facility in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
    /// Omitted for the default namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    pub target: String,
}

/// Output configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Color output setting
    #[serde(default)]
    pub color: ColorOption,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorOption::Auto,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}
