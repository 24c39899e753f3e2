//! Validator core, violations and the constraint registry

pub mod assert_that;
pub mod registry;
pub mod violation;

pub use assert_that::{AssertThat, ValidatorOptions};
pub use registry::{Constraint, ConstraintRegistry};
pub use violation::{Location, ValidationOutcome, Violation, ViolationSink};
