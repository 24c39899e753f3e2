//! Expressions compiled by the `evalexpr` evaluator
//!
//! Member paths such as `this.address.city` are single identifiers to the
//! evaluator; the engines resolve them against the subject before running the
//! program. Function identifiers keep their qualifier (`ns:fn`, `@name.fn`).

use crate::error::EvaluationError;
use evalexpr::{Context, EvalexprResult, Node, Value as EvalValue, build_operator_tree};

/// Deepest bracket or prefix-operator nesting accepted in source text
pub const MAX_NESTING: usize = 128;

/// Deepest operator tree accepted after compilation
pub const MAX_TREE_DEPTH: usize = 512;

const NESTED_TOO_DEEPLY: &str = "expression nested too deeply";

/// A parsed expression, shareable across threads
#[derive(Debug)]
pub struct Program {
    node: Node,
    variables: Vec<String>,
}

impl Program {
    /// Compiles `source`
    ///
    /// `expression` is the full declared text and `offset` the position of
    /// `source` inside it, so errors in a template block point into the
    /// template.
    pub fn compile(source: &str, expression: &str, offset: usize) -> Result<Self, EvaluationError> {
        let parse_error = |position: usize, message: String| EvaluationError::Parse {
            expression: expression.to_string(),
            position: offset + position,
            message,
        };

        if let Some(position) = nesting_overflow(source) {
            return Err(parse_error(position, NESTED_TOO_DEEPLY.to_string()));
        }
        let node = build_operator_tree(source).map_err(|e| parse_error(0, e.to_string()))?;
        if tree_depth(&node) > MAX_TREE_DEPTH {
            return Err(parse_error(0, NESTED_TOO_DEEPLY.to_string()));
        }

        let mut variables: Vec<String> = node
            .iter_variable_identifiers()
            .map(str::to_string)
            .collect();
        variables.sort_unstable();
        variables.dedup();

        Ok(Self { node, variables })
    }

    /// Variable identifiers read by the program, sorted and deduplicated
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn execute<C: Context>(&self, context: &C) -> EvalexprResult<EvalValue> {
        self.node.eval_with_context(context)
    }
}

/// Returns the byte offset at which nesting first exceeds [`MAX_NESTING`]
///
/// Counts open brackets plus the current run of prefix operators; string
/// literals are skipped.
fn nesting_overflow(source: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut prefix_run = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (position, c) in source.char_indices() {
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
            '"' => {
                in_string = true;
                prefix_run = 0;
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '!' | '-' => prefix_run += 1,
            c if c.is_whitespace() => {}
            _ => prefix_run = 0,
        }
        if depth + prefix_run > MAX_NESTING {
            return Some(position);
        }
    }
    None
}

/// Depth of the operator tree, computed without recursion
fn tree_depth(root: &Node) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(root, 1usize)];
    while let Some((node, depth)) = pending.pop() {
        deepest = deepest.max(depth);
        pending.extend(node.children().iter().map(|child| (child, depth + 1)));
    }
    deepest
}
