//! Output formatters (human and JSONL)
//!
//! Both formatters render the same three things: the result of a batch
//! run, the result of a single ad-hoc evaluation, and the list of declared
//! constraints.

pub mod human;
pub mod jsonl;

pub use human::HumanFormatter;
pub use jsonl::JsonlFormatter;

use crate::error::ValidationFault;
use crate::types::Engine;
use crate::validator::ValidationOutcome;

/// The result of evaluating one expression against one value
#[derive(Debug)]
pub struct Evaluation<'a> {
    pub expression: &'a str,
    pub engine: Engine,
    pub result: &'a Result<ValidationOutcome, ValidationFault>,
}

/// Renders a fault with its underlying cause
pub(crate) fn describe_fault(fault: &ValidationFault) -> String {
    format!("{}: {}", fault, fault.source)
}
