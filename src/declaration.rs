//! Declarations: the metadata attached to a value to describe one check

use crate::engine::Facility;
use crate::error::DeclarationError;
use crate::types::{Engine, PropertyPath};
use std::sync::Arc;

/// Message reported when a declaration does not set one
pub const DEFAULT_MESSAGE: &str = "must satisfy the asserted expression";

/// A namespace prefix bound to a facility
///
/// `prefix: None` binds the default namespace used by unqualified calls.
#[derive(Debug, Clone)]
pub struct NamespaceBinding {
    pub prefix: Option<String>,
    pub target: Arc<dyn Facility>,
}

/// Immutable description of an expression-based check
///
/// ```
/// use assert_that::{Declaration, Engine};
///
/// let declaration = Declaration::builder("this.age >= 18 || !empty(this.parent)")
///     .engine(Engine::Jexl)
///     .message("minors need a parent")
///     .property_node("age")
///     .build()
///     .unwrap();
/// assert_eq!(declaration.property_node().unwrap().as_str(), "age");
/// ```
#[derive(Debug, Clone)]
pub struct Declaration {
    expression: String,
    engine: Engine,
    message: String,
    namespaces: Vec<NamespaceBinding>,
    property_node: Option<PropertyPath>,
}

impl Declaration {
    pub fn builder(expression: impl Into<String>) -> DeclarationBuilder {
        DeclarationBuilder {
            expression: expression.into(),
            engine: Engine::default(),
            message: None,
            namespaces: Vec::new(),
            property_node: String::new(),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Namespace bindings in declaration order
    pub fn namespaces(&self) -> &[NamespaceBinding] {
        &self.namespaces
    }

    /// Path failures are reported against; `None` reports against the value itself
    pub fn property_node(&self) -> Option<&PropertyPath> {
        self.property_node.as_ref()
    }
}

/// Builder for [`Declaration`]
#[derive(Debug, Clone)]
pub struct DeclarationBuilder {
    expression: String,
    engine: Engine,
    message: Option<String>,
    namespaces: Vec<NamespaceBinding>,
    property_node: String,
}

impl DeclarationBuilder {
    pub fn engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Appends a namespace binding; later bindings for the same prefix win
    pub fn namespace(mut self, prefix: Option<&str>, target: Arc<dyn Facility>) -> Self {
        self.namespaces.push(NamespaceBinding {
            prefix: prefix.map(str::to_string),
            target,
        });
        self
    }

    /// Sets the property path failures are relocated to; empty means none
    pub fn property_node(mut self, node: impl Into<String>) -> Self {
        self.property_node = node.into();
        self
    }

    pub fn build(self) -> Result<Declaration, DeclarationError> {
        if self.expression.trim().is_empty() {
            return Err(DeclarationError::EmptyExpression);
        }
        let property_node =
            PropertyPath::parse_node(&self.property_node).map_err(DeclarationError::InvalidPropertyPath)?;

        Ok(Declaration {
            expression: self.expression,
            engine: self.engine,
            message: self.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            namespaces: self.namespaces,
            property_node,
        })
    }
}
