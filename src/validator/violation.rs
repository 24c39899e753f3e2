//! Validation outcomes and the sink violations are reported to

use crate::types::PropertyPath;
use std::fmt;

/// Where a violation is reported
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    /// The validated value as a whole
    Root,
    /// A named property of the validated value
    Property(PropertyPath),
}

impl Location {
    /// The property path, if the violation was relocated
    pub fn path(&self) -> Option<&PropertyPath> {
        match self {
            Location::Root => None,
            Location::Property(path) => Some(path),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Root => f.write_str("<root>"),
            Location::Property(path) => write!(f, "{}", path),
        }
    }
}

/// A failed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub message: String,
    pub location: Location,
}

/// Result of validating one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(Violation),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(violation) => Some(violation),
        }
    }
}

/// Receives violations from [`crate::validator::AssertThat::is_valid`]
pub trait ViolationSink {
    fn report(&mut self, violation: Violation);
}

impl ViolationSink for Vec<Violation> {
    fn report(&mut self, violation: Violation) {
        self.push(violation);
    }
}
