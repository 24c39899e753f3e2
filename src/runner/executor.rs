#![forbid(unsafe_code)]

//! Parallel validation of documents against every declared constraint
//!
//! This module provides the ValidationRunner, which evaluates each document
//! against each constraint in a registry in parallel using rayon.

use crate::error::ValidationFault;
use crate::runner::input_walker::Document;
use crate::types::ConstraintId;
use crate::validator::{ConstraintRegistry, ValidationOutcome, Violation};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// A violation found in one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub constraint: ConstraintId,
    pub source: PathBuf,
    /// 1-based line for JSON Lines inputs
    pub line: Option<usize>,
    pub violation: Violation,
}

/// A document that could not be evaluated against a constraint
#[derive(Debug)]
pub struct FaultReport {
    pub constraint: ConstraintId,
    pub source: PathBuf,
    pub line: Option<usize>,
    pub fault: ValidationFault,
}

/// Result of validating all documents against all constraints
#[derive(Debug, Default)]
pub struct RunResult {
    /// Violations, sorted by source, line and constraint
    pub reports: Vec<Report>,
    /// Evaluation faults, sorted the same way
    pub faults: Vec<FaultReport>,
    /// Number of documents checked
    pub documents_checked: usize,
    /// Number of constraints evaluated per document
    pub constraints_evaluated: usize,
}

impl RunResult {
    /// True when every document satisfied every constraint
    pub fn is_clean(&self) -> bool {
        self.reports.is_empty() && self.faults.is_empty()
    }
}

enum Finding {
    Violation(Report),
    Fault(FaultReport),
}

/// Runs every constraint of a registry over a set of documents
///
/// Validators are shared read-only across rayon workers; each
/// document/constraint pair is evaluated independently.
#[derive(Debug, Clone)]
pub struct ValidationRunner {
    registry: Arc<ConstraintRegistry>,
}

impl ValidationRunner {
    pub fn new(registry: ConstraintRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ConstraintRegistry {
        &self.registry
    }

    /// Validates every document against every constraint
    pub fn run(&self, documents: &[Document]) -> RunResult {
        let findings: Vec<Finding> = documents
            .par_iter()
            .flat_map_iter(|document| {
                self.registry.iter().filter_map(move |constraint| {
                    match constraint.validator.validate_value(&document.value) {
                        Ok(ValidationOutcome::Valid) => None,
                        Ok(ValidationOutcome::Invalid(violation)) => Some(Finding::Violation(Report {
                            constraint: constraint.id.clone(),
                            source: document.source.clone(),
                            line: document.line,
                            violation,
                        })),
                        Err(fault) => Some(Finding::Fault(FaultReport {
                            constraint: constraint.id.clone(),
                            source: document.source.clone(),
                            line: document.line,
                            fault,
                        })),
                    }
                })
            })
            .collect();

        let mut result = RunResult {
            documents_checked: documents.len(),
            constraints_evaluated: self.registry.len(),
            ..RunResult::default()
        };
        for finding in findings {
            match finding {
                Finding::Violation(report) => result.reports.push(report),
                Finding::Fault(fault) => result.faults.push(fault),
            }
        }

        result.reports.sort_by(|a, b| {
            (&a.source, a.line, &a.constraint).cmp(&(&b.source, b.line, &b.constraint))
        });
        result.faults.sort_by(|a, b| {
            (&a.source, a.line, &a.constraint).cmp(&(&b.source, b.line, &b.constraint))
        });

        info!(
            documents = result.documents_checked,
            constraints = result.constraints_evaluated,
            violations = result.reports.len(),
            faults = result.faults.len(),
            "validation finished"
        );
        result
    }
}
