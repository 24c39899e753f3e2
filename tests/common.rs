//! Test utilities for assert-that integration tests

#![allow(dead_code)]

use assert_that::{AssertThat, Declaration, Engine};
use std::fs;
use std::path::{Path, PathBuf};

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Extract Some value or panic with context
#[macro_export]
macro_rules! assert_some {
    ($expr:expr) => {
        match $expr {
            Some(v) => v,
            None => panic!("assertion failed: expected Some, got None"),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Some(v) => v,
            None => panic!("{}: got None", $msg),
        }
    };
}

/// Path of a file under `tests/fixtures`
pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

/// Binds `expression` for `engine` with default options
pub fn validator(engine: Engine, expression: &str) -> AssertThat {
    let declaration = Declaration::builder(expression)
        .engine(engine)
        .build()
        .expect("declaration should build");
    AssertThat::initialize(declaration)
}

/// Writes `content` to `dir/name`, creating parent directories
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
