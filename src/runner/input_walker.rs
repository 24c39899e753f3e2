//! Input discovery and document loading
//!
//! This module provides gitignore-aware walking for `.json` and `.jsonl`
//! inputs with glob-based filtering, and turns input files into documents.

use crate::types::GlobPattern;
use globset::{Glob, GlobSetBuilder};
use ignore::WalkBuilder;
use serde_json::Value;
use std::borrow::Borrow;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while discovering or loading inputs
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed JSON in {}{}: {source}", .path.display(), line_suffix(.line))]
    Json {
        path: PathBuf,
        line: Option<usize>,
        source: serde_json::Error,
    },
}

fn line_suffix(line: impl Borrow<Option<usize>>) -> String {
    line.borrow()
        .map(|l| format!(" line {}", l))
        .unwrap_or_default()
}

/// How a file holds its documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InputFormat {
    /// One JSON document per file
    Json,
    /// One JSON document per non-blank line
    JsonLines,
}

impl InputFormat {
    /// Detects the format from the file extension
    pub fn detect(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Some(InputFormat::Json),
            Some("jsonl") => Some(InputFormat::JsonLines),
            _ => None,
        }
    }
}

/// Reason why a file was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// File did not match include patterns, or matched an exclude pattern
    ExcludedByPattern,
    /// File is neither `.json` nor `.jsonl`
    UnsupportedExtension,
    /// Not a regular file
    NotAFile,
}

/// Result of walking - either an input to load or a skipped path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkResult {
    Input(InputFile),
    Skipped { path: PathBuf, reason: SkipReason },
}

/// A discovered input file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InputFile {
    pub path: PathBuf,
    pub format: InputFormat,
}

/// One value to validate
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File the document came from
    pub source: PathBuf,
    /// 1-based line number for JSON Lines inputs
    pub line: Option<usize>,
    pub value: Value,
}

/// Iterator over discovered inputs
pub struct InputWalker {
    walker: ignore::Walk,
    include_set: Option<globset::GlobSet>,
    exclude_set: globset::GlobSet,
}

impl InputWalker {
    /// Creates a new InputWalker
    ///
    /// # Arguments
    /// * `root` - Root directory to walk
    /// * `include` - Include patterns (empty means include all)
    /// * `exclude` - Exclude patterns (applied after include)
    pub fn new(root: &Path, include: &[GlobPattern], exclude: &[GlobPattern]) -> Result<Self, InputError> {
        let walker = WalkBuilder::new(root)
            .hidden(false) // Don't skip hidden files by default
            .git_ignore(true) // Respect .gitignore
            .build();

        let include_set = if include.is_empty() {
            None
        } else {
            Some(build_globset(include)?)
        };

        // Always exclude .git directory, merging with user-provided excludes
        let mut exclude_patterns = Vec::from(exclude);
        exclude_patterns.push(GlobPattern::new("**/.git/**"));
        let exclude_set = build_globset(&exclude_patterns)?;

        Ok(Self {
            walker,
            include_set,
            exclude_set,
        })
    }

    /// Walks the directory tree and returns an iterator over matching inputs
    pub fn walk(self) -> impl Iterator<Item = Result<InputFile, InputError>> {
        self.walk_with_skip_info().filter_map(|result| match result {
            Ok(WalkResult::Input(input)) => Some(Ok(input)),
            Ok(WalkResult::Skipped { path, reason }) => {
                debug!(path = %path.display(), ?reason, "skipping input");
                None
            }
            Err(e) => Some(Err(e)),
        })
    }

    /// Walks the directory tree and returns an iterator with skip information
    pub fn walk_with_skip_info(self) -> impl Iterator<Item = Result<WalkResult, InputError>> {
        let include_set = self.include_set;
        let exclude_set = self.exclude_set;

        self.walker.map(move |result| {
            let entry = result?;
            let path = entry.path();

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                return Ok(WalkResult::Skipped {
                    path: path.to_path_buf(),
                    reason: SkipReason::NotAFile,
                });
            }

            let included = include_set.as_ref().is_none_or(|set| set.is_match(path));
            if !included || exclude_set.is_match(path) {
                return Ok(WalkResult::Skipped {
                    path: path.to_path_buf(),
                    reason: SkipReason::ExcludedByPattern,
                });
            }

            match InputFormat::detect(path) {
                Some(format) => Ok(WalkResult::Input(InputFile {
                    path: path.to_path_buf(),
                    format,
                })),
                None => Ok(WalkResult::Skipped {
                    path: path.to_path_buf(),
                    reason: SkipReason::UnsupportedExtension,
                }),
            }
        })
    }
}

/// Builds a GlobSet from patterns
fn build_globset(patterns: &[GlobPattern]) -> Result<globset::GlobSet, InputError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern.as_str()).map_err(|e| InputError::InvalidGlob {
            pattern: pattern.as_str().to_string(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| InputError::InvalidGlob {
        pattern: "<globset>".to_string(),
        source: e,
    })
}

/// Collects inputs from a mix of files and directories
///
/// Directories are walked with the include/exclude patterns. Files named
/// explicitly are always taken; one without a `.jsonl` extension is read as
/// a single JSON document. The result is sorted and free of duplicates.
pub fn discover_inputs(
    paths: &[PathBuf],
    include: &[GlobPattern],
    exclude: &[GlobPattern],
) -> Result<Vec<InputFile>, InputError> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_file() {
            inputs.push(InputFile {
                path: path.clone(),
                format: InputFormat::detect(path).unwrap_or(InputFormat::Json),
            });
        } else {
            for input in InputWalker::new(path, include, exclude)?.walk() {
                inputs.push(input?);
            }
        }
    }
    inputs.sort();
    inputs.dedup();
    Ok(inputs)
}

/// Reads the documents held by an input file
pub fn load_documents(input: &InputFile) -> Result<Vec<Document>, InputError> {
    let content = fs::read_to_string(&input.path).map_err(|source| InputError::Io {
        path: input.path.clone(),
        source,
    })?;

    match input.format {
        InputFormat::Json => {
            let value = serde_json::from_str(&content).map_err(|source| InputError::Json {
                path: input.path.clone(),
                line: None,
                source,
            })?;
            Ok(vec![Document {
                source: input.path.clone(),
                line: None,
                value,
            }])
        }
        InputFormat::JsonLines => content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                let value = serde_json::from_str(line).map_err(|source| InputError::Json {
                    path: input.path.clone(),
                    line: Some(i + 1),
                    source,
                })?;
                Ok(Document {
                    source: input.path.clone(),
                    line: Some(i + 1),
                    value,
                })
            })
            .collect(),
    }
}
