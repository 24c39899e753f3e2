//! Spel engine: `#{...}` templates with permissive boolean coercion
//!
//! The expression text is a template. Literal text outside the delimiters is
//! kept as-is; each `#{...}` block holds one expression in the `evalexpr`
//! grammar. A template made of exactly one expression block yields that
//! expression's value, anything else is rendered into a string. The result is
//! then coerced to a boolean (see [`coerce_to_bool`]).
//!
//! Inside a block, `this` is a property of the root object and members are
//! read with dotted paths. `@name.fn(args)` calls a component through the
//! resolver. Operators are the evaluator's own: operands of `&&` and `||`
//! must already be booleans, and ordering against `null` (`this.x > 1` with
//! a null `x`) is an evaluation error rather than `false`.

use crate::engine::ExpressionEngine;
use crate::engine::catalog::ComponentResolver;
use crate::engine::context::{Environment, SpelContext};
use crate::engine::namespace::{facility_failure, spread_arguments};
use crate::engine::program::Program;
use crate::engine::value::{coerce_to_bool, from_eval, to_display};
use crate::error::EvaluationError;
use crate::types::Engine;
use evalexpr::Value as EvalValue;
use serde_json::Value;
use std::sync::Arc;

const OPEN: &str = "#{";

/// Evaluates Spel templates
#[derive(Debug, Default)]
pub struct SpelEngine {
    components: Option<Arc<dyn ComponentResolver>>,
}

impl SpelEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a resolver for `@name` component references
    pub fn with_components(components: Arc<dyn ComponentResolver>) -> Self {
        Self {
            components: Some(components),
        }
    }

    /// Evaluates the template with `this` bound to `subject`, returning the raw value
    pub fn evaluate_value(&self, expression: &str, subject: &Value) -> Result<Value, EvaluationError> {
        let parts = parse_template(expression)?;
        let context = SpelContext::for_subject(subject, self.components.as_deref());

        if let [TemplatePart::Expression(program)] = parts.as_slice() {
            return run(program, &context);
        }

        let mut rendered = String::new();
        for part in &parts {
            match part {
                TemplatePart::Literal(text) => rendered.push_str(text),
                TemplatePart::Expression(program) => match run(program, &context)? {
                    Value::Null => {}
                    value => rendered.push_str(&to_display(&value)),
                },
            }
        }
        Ok(Value::String(rendered))
    }
}

impl ExpressionEngine for SpelEngine {
    fn kind(&self) -> Engine {
        Engine::Spel
    }

    fn evaluate(&self, expression: &str, subject: &Value) -> Result<bool, EvaluationError> {
        coerce_to_bool(&self.evaluate_value(expression, subject)?)
    }
}

fn run(program: &Program, context: &SpelContext<'_>) -> Result<Value, EvaluationError> {
    let environment = Environment::bind(
        program.variables(),
        |path| context.resolve(path),
        false,
        |identifier, argument| call_component(context, identifier, argument),
    );
    match program.execute(&environment) {
        Ok(value) => Ok(from_eval(&value)),
        Err(error) => Err(environment.into_error(error)),
    }
}

/// Dispatches `@name.fn(args)`; Spel has no other functions
fn call_component(
    context: &SpelContext<'_>,
    identifier: &str,
    argument: &EvalValue,
) -> Result<Value, EvaluationError> {
    let Some((component, function)) = identifier
        .strip_prefix('@')
        .and_then(|reference| reference.split_once('.'))
    else {
        return Err(EvaluationError::UnknownFunction(identifier.to_string()));
    };

    let facility = context
        .components()
        .and_then(|resolver| resolver.component(component))
        .ok_or_else(|| EvaluationError::UnknownComponent(component.to_string()))?;
    let args = spread_arguments(&*facility, function, argument);
    facility
        .call(function, &args)
        .map_err(|e| facility_failure(identifier, e))
}

/// A piece of a parsed template
#[derive(Debug)]
pub enum TemplatePart {
    Literal(String),
    Expression(Program),
}

/// Splits a template into literal text and compiled `#{...}` expressions
pub fn parse_template(template: &str) -> Result<Vec<TemplatePart>, EvaluationError> {
    let mut parts = Vec::new();
    let mut rest = 0;

    while let Some(found) = template[rest..].find(OPEN) {
        let open = rest + found;
        if open > rest {
            parts.push(TemplatePart::Literal(template[rest..open].to_string()));
        }

        let body_start = open + OPEN.len();
        let close = find_closing_brace(template, body_start).ok_or_else(|| EvaluationError::Parse {
            expression: template.to_string(),
            position: open,
            message: "no closing '}' for expression block".to_string(),
        })?;

        let body = &template[body_start..close];
        parts.push(TemplatePart::Expression(Program::compile(
            body, template, body_start,
        )?));
        rest = close + 1;
    }

    if rest < template.len() {
        parts.push(TemplatePart::Literal(template[rest..].to_string()));
    }
    Ok(parts)
}

/// Finds the `}` closing a block whose body starts at `start`
///
/// Braces, brackets and parentheses nest; string literals are skipped.
fn find_closing_brace(template: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in template[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' | '[' | '(' => depth += 1,
            '}' if depth == 0 => return Some(start + offset),
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}
