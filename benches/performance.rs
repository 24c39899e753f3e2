//! Performance benchmarks for assert-that
//!
//! These benchmarks measure the performance of key operations:
//! - Jexl evaluation with and without the compiled-expression cache
//! - Spel template evaluation
//! - Input discovery and loading
//! - Parallel batch validation
//!
//! ## Running Benchmarks
//!
//! To run all benchmarks:
//! ```bash
//! cargo bench
//! ```
//!
//! To run specific benchmarks:
//! ```bash
//! cargo bench jexl_evaluation
//! cargo bench batch_validation
//! ```
//!
//! ## Expected Performance Characteristics
//!
//! ### Evaluation
//! - A cache hit skips lexing and parsing; evaluation is a tree walk
//! - With the cache disabled every call re-parses the expression
//! - Spel templates are re-parsed on every call
//!
//! ### Batch Validation
//! - Uses rayon for parallelism across documents
//! - Validators are shared read-only; only the cache lock is contended

use assert_that::config::Config;
use assert_that::engine::{ExpressionEngine, JexlEngine, SpelEngine};
use assert_that::runner::{Document, ValidationRunner, discover_inputs, load_documents};
use assert_that::types::GlobPattern;
use assert_that::validator::ConstraintRegistry;
use assert_that::FacilityCatalog;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const EXPRESSION: &str = "this.age >= 18 || (!empty(this.parent) && len(this.code) == 4)";

const DECLARATIONS: &str = r##"
[[assert]]
id = "adult-or-guardian"
expression = "this.age >= 18 || !empty(this.parent)"
property_node = "age"

[[assert]]
id = "known-grade"
expression = '#{@builtins.matches(this.grade, "[A-F]")}'
engine = "spel"

[[assert]]
id = "code-format"
expression = "upper(this.code) == this.code && len(this.code) == 4"
"##;

// ============================================================================
// Helper Functions
// ============================================================================

fn person(i: usize) -> Value {
    let parent = if i % 3 == 0 {
        Value::Null
    } else {
        json!({"name": "Kim"})
    };
    let grade = ["A", "B", "C", "G"][i % 4];
    let code = if i % 5 == 0 { "ab12" } else { "AB12" };
    json!({
        "age": i % 40,
        "parent": parent,
        "grade": grade,
        "code": code,
    })
}

/// Create a temporary directory with JSON Lines files of people
fn create_test_inputs(files: usize, lines_per_file: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for f in 0..files {
        let content: String = (0..lines_per_file)
            .map(|i| format!("{}\n", person(f * lines_per_file + i)))
            .collect();
        fs::write(temp_dir.path().join(format!("people{}.jsonl", f)), content).unwrap();
    }
    temp_dir
}

fn load_all(root: PathBuf) -> Vec<Document> {
    let include = vec![GlobPattern::new("**/*.jsonl")];
    discover_inputs(&[root], &include, &[])
        .unwrap()
        .iter()
        .flat_map(|input| load_documents(input).unwrap())
        .collect()
}

// ============================================================================
// Evaluation Benchmarks
// ============================================================================

/// Benchmark Jexl evaluation with the cache enabled and disabled
fn bench_jexl_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("jexl_evaluation");
    let subject = person(7);

    let cached = JexlEngine::builder().strict(true).build();
    group.bench_function("cached", |b| {
        b.iter(|| black_box(cached.evaluate(black_box(EXPRESSION), &subject)))
    });

    let uncached = JexlEngine::builder().cache(0).strict(true).build();
    group.bench_function("uncached", |b| {
        b.iter(|| black_box(uncached.evaluate(black_box(EXPRESSION), &subject)))
    });

    group.finish();
}

/// Benchmark Spel template evaluation
fn bench_spel_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("spel_evaluation");
    let subject = person(7);
    let engine = SpelEngine::new();

    for template in [
        "#{this.age >= 18 || this.parent != null}",
        "#{this.grade}#{this.code}",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(template), template, |b, t| {
            b.iter(|| black_box(engine.evaluate(t, &subject)))
        });
    }

    group.finish();
}

// ============================================================================
// Batch Benchmarks
// ============================================================================

/// Benchmark discovering and loading inputs
fn bench_input_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("input_loading");

    for file_count in [10, 50] {
        let temp_dir = create_test_inputs(file_count, 100);
        group.throughput(Throughput::Elements((file_count * 100) as u64));
        group.bench_with_input(BenchmarkId::new("jsonl", file_count), &file_count, |b, _| {
            b.iter(|| black_box(load_all(temp_dir.path().to_path_buf())))
        });
    }

    group.finish();
}

/// Benchmark parallel validation of many documents against several constraints
fn bench_batch_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_validation");
    group.sample_size(10);

    let config = Config::parse(DECLARATIONS).unwrap();
    let catalog = FacilityCatalog::new();
    let registry =
        ConstraintRegistry::from_config(&config, &catalog, Some(Arc::new(catalog.clone()))).unwrap();
    let runner = ValidationRunner::new(registry);

    for document_count in [1_000, 10_000] {
        let documents: Vec<Document> = (0..document_count)
            .map(|i| Document {
                source: PathBuf::from("bench.jsonl"),
                line: Some(i + 1),
                value: person(i),
            })
            .collect();

        group.throughput(Throughput::Elements(document_count as u64));
        group.bench_with_input(
            BenchmarkId::new("documents", document_count),
            &documents,
            |b, documents| b.iter(|| black_box(runner.run(documents))),
        );
    }

    group.finish();
}

// ============================================================================
// Benchmark Registration
// ============================================================================

criterion_group!(evaluation_benches, bench_jexl_evaluation, bench_spel_evaluation,);

criterion_group!(batch_benches, bench_input_loading, bench_batch_validation,);

criterion_main!(evaluation_benches, batch_benches);
