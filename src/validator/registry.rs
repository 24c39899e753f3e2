//! Constraint registry: one bound validator per declared assertion
//!
//! The ConstraintRegistry is responsible for:
//! - Turning `[[assert]]` entries into declarations
//! - Resolving namespace targets against a facility catalog
//! - Binding each declaration to its validator
//! - Providing access to validators by ID, in declaration order

use crate::config::{AssertionConfig, Config};
use crate::declaration::Declaration;
use crate::engine::{ComponentResolver, FacilityCatalog};
use crate::error::DeclarationError;
use crate::types::ConstraintId;
use crate::validator::assert_that::{AssertThat, ValidatorOptions};
use std::collections::HashMap;
use std::sync::Arc;

/// A declared constraint: its ID and bound validator
#[derive(Debug)]
pub struct Constraint {
    pub id: ConstraintId,
    pub validator: AssertThat,
}

/// Validators built from a declarations file
#[derive(Debug, Default)]
pub struct ConstraintRegistry {
    constraints: Vec<Constraint>,
    index: HashMap<ConstraintId, usize>,
}

impl ConstraintRegistry {
    /// Create a new empty ConstraintRegistry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a validator for every `[[assert]]` entry of `config`
    ///
    /// # Errors
    ///
    /// Returns `DeclarationError` if:
    /// - Two entries share an ID
    /// - An entry has an empty expression or invalid property node
    /// - A namespace target is not in `catalog`
    pub fn from_config(
        config: &Config,
        catalog: &FacilityCatalog,
        components: Option<Arc<dyn ComponentResolver>>,
    ) -> Result<Self, DeclarationError> {
        let mut registry = Self::new();
        for assertion in &config.assertions {
            let declaration = declaration_for(assertion, catalog)?;
            let options = ValidatorOptions {
                cache_size: config.settings.cache_size,
                components: components.clone(),
            };
            registry.add(
                assertion.id.clone(),
                AssertThat::with_options(declaration, options),
            )?;
        }
        Ok(registry)
    }

    /// Adds a validator under `id`
    pub fn add(&mut self, id: ConstraintId, validator: AssertThat) -> Result<(), DeclarationError> {
        if self.index.contains_key(&id) {
            return Err(DeclarationError::DuplicateId(id.to_string()));
        }
        self.index.insert(id.clone(), self.constraints.len());
        self.constraints.push(Constraint { id, validator });
        Ok(())
    }

    pub fn get(&self, id: &ConstraintId) -> Option<&AssertThat> {
        self.index.get(id).map(|&i| &self.constraints[i].validator)
    }

    /// Iterates constraints in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

fn declaration_for(
    assertion: &AssertionConfig,
    catalog: &FacilityCatalog,
) -> Result<Declaration, DeclarationError> {
    let mut builder = Declaration::builder(assertion.expression.clone()).engine(assertion.engine);

    if let Some(message) = &assertion.message {
        builder = builder.message(message.clone());
    }
    if let Some(node) = &assertion.property_node {
        builder = builder.property_node(node.clone());
    }

    for namespace in &assertion.namespaces {
        let target = catalog
            .get(&namespace.target)
            .ok_or_else(|| DeclarationError::UnknownFacility {
                prefix: namespace.prefix.clone().unwrap_or_default(),
                target: namespace.target.clone(),
            })?;
        builder = builder.namespace(namespace.prefix.as_deref(), target);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Engine;
    use serde_json::json;

    const CONFIG: &str = r##"
[settings]
cache_size = 16

[[assert]]
id = "adult"
expression = "this.age >= 18"
property_node = "age"

[[assert]]
id = "named"
expression = "#{this.name != null}"
engine = "spel"

[[assert]]
id = "upper"
expression = "b:upper(this.code) == this.code"
namespaces = [{ prefix = "b", target = "builtins" }]
"##;

    fn registry() -> ConstraintRegistry {
        let config = Config::parse(CONFIG).unwrap();
        ConstraintRegistry::from_config(&config, &FacilityCatalog::new(), None).unwrap()
    }

    #[test]
    fn test_from_config_keeps_declaration_order() {
        let registry = registry();
        assert_eq!(registry.len(), 3);
        let ids: Vec<&str> = registry.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["adult", "named", "upper"]);
        assert_eq!(
            registry.get(&ConstraintId::new("named").unwrap()).unwrap().engine(),
            Engine::Spel
        );
    }

    #[test]
    fn test_namespace_targets_resolve() {
        let registry = registry();
        let upper = registry.get(&ConstraintId::new("upper").unwrap()).unwrap();
        assert!(upper.validate_value(&json!({"code": "AB"})).unwrap().is_valid());
        assert!(!upper.validate_value(&json!({"code": "ab"})).unwrap().is_valid());
    }

    #[test]
    fn test_unknown_facility() {
        let config = Config::parse(
            r#"
[[assert]]
id = "a"
expression = "x:f()"
namespaces = [{ prefix = "x", target = "missing" }]
"#,
        )
        .unwrap();
        let err = ConstraintRegistry::from_config(&config, &FacilityCatalog::new(), None).unwrap_err();
        assert!(matches!(
            err,
            DeclarationError::UnknownFacility { ref prefix, ref target } if prefix == "x" && target == "missing"
        ));
    }

    #[test]
    fn test_duplicate_add() {
        let mut registry = ConstraintRegistry::new();
        let id = ConstraintId::new("dup").unwrap();
        let make = || AssertThat::initialize(Declaration::builder("true").build().unwrap());
        registry.add(id.clone(), make()).unwrap();
        assert!(matches!(
            registry.add(id, make()),
            Err(DeclarationError::DuplicateId(_))
        ));
        assert_eq!(registry.len(), 1);
    }
}
