#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in a deterministic order:
//! 1. All violation records (sorted by file, line, constraint)
//! 2. All fault records (same order)
//! 3. One status record

use crate::output::{Evaluation, describe_fault};
use crate::runner::{FaultReport, Report, RunResult};
use crate::validator::{ConstraintRegistry, ValidationOutcome};
use serde::Serialize;
use std::path::PathBuf;

/// JSONL output formatter
///
/// Formats results as JSON Lines (one JSON object per line).
#[derive(Debug, Default)]
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format a batch run as JSONL
    ///
    /// The runner already sorts reports and faults, so records keep its order.
    pub fn format_run(&self, result: &RunResult) -> String {
        let mut output = String::new();

        for report in &result.reports {
            push_record(&mut output, &ViolationRecord::from_report(report));
        }
        for fault in &result.faults {
            push_record(&mut output, &FaultRecord::from_report(fault));
        }

        push_record(
            &mut output,
            &StatusRecord {
                record_type: "status",
                passed: result.is_clean(),
                documents_checked: result.documents_checked as u64,
                constraints: result.constraints_evaluated as u64,
                violations: result.reports.len() as u64,
                faults: result.faults.len() as u64,
            },
        );
        output
    }

    /// Format a single evaluation as one record
    pub fn format_evaluation(&self, evaluation: &Evaluation<'_>) -> String {
        let mut output = String::new();
        match evaluation.result {
            Ok(outcome) => {
                let violation = outcome.violation();
                push_record(
                    &mut output,
                    &ResultRecord {
                        record_type: "result",
                        expression: evaluation.expression,
                        engine: evaluation.engine.as_str(),
                        valid: matches!(outcome, ValidationOutcome::Valid),
                        property: violation.and_then(|v| v.location.path()).map(|p| p.to_string()),
                        message: violation.map(|v| v.message.clone()),
                    },
                );
            }
            Err(fault) => push_record(
                &mut output,
                &FaultRecord {
                    record_type: "fault",
                    constraint: None,
                    file: None,
                    line: None,
                    expression: fault.expression.clone(),
                    value: fault.value.clone(),
                    error: describe_fault(fault),
                },
            ),
        }
        output
    }

    /// Format the declared constraints, one record each
    pub fn format_constraints(&self, registry: &ConstraintRegistry) -> String {
        let mut output = String::new();
        for constraint in registry.iter() {
            let declaration = constraint.validator.declaration();
            push_record(
                &mut output,
                &ConstraintRecord {
                    record_type: "constraint",
                    id: constraint.id.to_string(),
                    engine: constraint.validator.engine().as_str(),
                    expression: declaration.expression().to_string(),
                    message: declaration.message().to_string(),
                    property_node: declaration.property_node().map(|p| p.to_string()),
                    namespaces: declaration
                        .namespaces()
                        .iter()
                        .map(|n| n.prefix.clone().unwrap_or_default())
                        .collect(),
                },
            );
        }
        output
    }
}

fn push_record<T: Serialize>(output: &mut String, record: &T) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

/// Violation record for JSONL output
#[derive(Debug, Serialize)]
struct ViolationRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    constraint: String,
    file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    property: Option<String>,
    message: String,
}

impl ViolationRecord {
    fn from_report(report: &Report) -> Self {
        Self {
            record_type: "violation",
            constraint: report.constraint.to_string(),
            file: report.source.clone(),
            line: report.line,
            property: report.violation.location.path().map(|p| p.to_string()),
            message: report.violation.message.clone(),
        }
    }
}

/// Fault record for JSONL output
#[derive(Debug, Serialize)]
struct FaultRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    constraint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    expression: String,
    value: String,
    error: String,
}

impl FaultRecord {
    fn from_report(report: &FaultReport) -> Self {
        Self {
            record_type: "fault",
            constraint: Some(report.constraint.to_string()),
            file: Some(report.source.clone()),
            line: report.line,
            expression: report.fault.expression.clone(),
            value: report.fault.value.clone(),
            error: describe_fault(&report.fault),
        }
    }
}

/// Status record for JSONL output
#[derive(Debug, Serialize)]
struct StatusRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    passed: bool,
    documents_checked: u64,
    constraints: u64,
    violations: u64,
    faults: u64,
}

#[derive(Debug, Serialize)]
struct ResultRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    expression: &'a str,
    engine: &'static str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConstraintRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    id: String,
    engine: &'static str,
    expression: String,
    message: String,
    property_node: Option<String>,
    namespaces: Vec<String>,
}
