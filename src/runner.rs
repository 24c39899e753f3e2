//! Batch validation of JSON inputs

pub mod executor;
pub mod input_walker;

pub use executor::{FaultReport, Report, RunResult, ValidationRunner};
pub use input_walker::{
    Document, InputError, InputFile, InputFormat, InputWalker, discover_inputs, load_documents,
};
