#![forbid(unsafe_code)]

//! Human-readable output formatter
//!
//! Writes colored text through `termcolor`. Callers pick the sink: a
//! `StandardStream` for the terminal, or a `Buffer` when capturing output.

use crate::output::{Evaluation, describe_fault};
use crate::runner::{FaultReport, Report, RunResult};
use crate::validator::{ConstraintRegistry, ValidationOutcome};
use std::io;
use std::path::Path;
use termcolor::{Color, ColorSpec, WriteColor};

/// Human-readable output formatter
#[derive(Debug, Default)]
pub struct HumanFormatter;

impl HumanFormatter {
    /// Creates a new HumanFormatter
    pub fn new() -> Self {
        HumanFormatter
    }

    /// Writes every violation and fault of a run, followed by a summary
    pub fn write_run(&self, out: &mut dyn WriteColor, result: &RunResult) -> io::Result<()> {
        for report in &result.reports {
            self.write_report(out, report)?;
        }
        for fault in &result.faults {
            self.write_fault(out, fault)?;
        }
        if !result.reports.is_empty() || !result.faults.is_empty() {
            writeln!(out)?;
        }

        writeln!(
            out,
            "Checked {} document(s) against {} constraint(s): {} violation(s), {} fault(s)",
            result.documents_checked,
            result.constraints_evaluated,
            result.reports.len(),
            result.faults.len()
        )?;

        if result.is_clean() {
            paint(out, Color::Green, "Check PASSED")?;
            writeln!(out)
        } else {
            paint(out, Color::Red, "Check FAILED")?;
            writeln!(out)
        }
    }

    /// Writes the outcome of a single evaluation
    pub fn write_evaluation(&self, out: &mut dyn WriteColor, evaluation: &Evaluation<'_>) -> io::Result<()> {
        match evaluation.result {
            Ok(ValidationOutcome::Valid) => {
                paint(out, Color::Green, "valid")?;
                writeln!(out)
            }
            Ok(ValidationOutcome::Invalid(violation)) => {
                paint(out, Color::Red, "invalid")?;
                writeln!(out, " {}: {}", violation.location, violation.message)
            }
            Err(fault) => {
                paint(out, Color::Magenta, "fault")?;
                writeln!(out, " [{}] {}", evaluation.engine, describe_fault(fault))
            }
        }
    }

    /// Writes one line per declared constraint
    pub fn write_constraints(&self, out: &mut dyn WriteColor, registry: &ConstraintRegistry) -> io::Result<()> {
        if registry.is_empty() {
            return writeln!(out, "No constraints are declared.");
        }

        let width = registry.iter().map(|c| c.id.as_str().len()).max().unwrap_or(0);
        for constraint in registry.iter() {
            let declaration = constraint.validator.declaration();
            out.set_color(ColorSpec::new().set_bold(true))?;
            write!(out, "{:<width$}", constraint.id.as_str(), width = width)?;
            out.reset()?;
            write!(out, "  {:<4}  {}", constraint.validator.engine().as_str(), declaration.expression())?;
            if let Some(node) = declaration.property_node() {
                write!(out, "  -> {}", node)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_report(&self, out: &mut dyn WriteColor, report: &Report) -> io::Result<()> {
        write_position(out, &report.source, report.line)?;
        paint(out, Color::Red, report.constraint.as_str())?;
        writeln!(out, ": {}: {}", report.violation.location, report.violation.message)
    }

    fn write_fault(&self, out: &mut dyn WriteColor, fault: &FaultReport) -> io::Result<()> {
        write_position(out, &fault.source, fault.line)?;
        paint(out, Color::Magenta, fault.constraint.as_str())?;
        writeln!(out, ": fault: {}", describe_fault(&fault.fault))
    }
}

fn write_position(out: &mut dyn WriteColor, source: &Path, line: Option<usize>) -> io::Result<()> {
    match line {
        Some(line) => write!(out, "{}:{}: ", source.display(), line),
        None => write!(out, "{}: ", source.display()),
    }
}

fn paint(out: &mut dyn WriteColor, color: Color, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", text)?;
    out.reset()
}
