//! Criterion benchmarks for the generation pipeline: schema resolution,
//! case selection, and document rendering.

use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use beaker_matrix::core::db::{Case, Database, HostType, Pattern, Suite, Tree, database_schema};
use beaker_matrix::core::planner::{JobOptions, compose_job};
use beaker_matrix::core::target::Target;
use beaker_matrix::reporting::beaker::render_job;
use beaker_matrix::schema::Context;

const DATABASE_YAML: &str = r#"
description: Bench database
trees:
  mainline:
    description: Upstream development tree
  stable:
    description: Stable maintenance tree
arches: [x86_64, aarch64, ppc64le, s390x]
sets:
  general: General purpose coverage
host_types:
  normal:
    description: Default lab machine
host_type_regex: normal
"#;

/// Builds a database with `suites` suites of `cases` cases each, without
/// touching the file system.
fn synthetic_database(suites: usize, cases: usize) -> Database {
    let mut trees = BTreeMap::new();
    trees.insert("mainline".to_string(), Tree::default());
    trees.insert("stable".to_string(), Tree::default());

    let mut host_types = BTreeMap::new();
    host_types.insert("normal".to_string(), HostType::default());

    let suites = (0..suites)
        .map(|suite_index| Suite {
            name: format!("suite-{suite_index}"),
            description: String::new(),
            location: "https://tests.example.com/${tree}.git".to_string(),
            host_type_regex: None,
            maintainers: vec![],
            cases: (0..cases)
                .map(|case_index| Case {
                    name: format!("case-{case_index}"),
                    description: String::new(),
                    tasks: Some(format!("tests/case-{case_index}")),
                    max_duration_seconds: Some(3600),
                    host_type_regex: None,
                    waived: false,
                    environment: BTreeMap::new(),
                    patterns: vec![Pattern {
                        trees: vec!["mainline|stable".to_string()],
                        arches: vec![],
                        sets: vec![],
                        sources: vec![],
                    }],
                })
                .collect(),
        })
        .collect();

    Database {
        description: String::new(),
        trees,
        arches: vec!["x86_64".to_string(), "aarch64".to_string()],
        sets: BTreeMap::new(),
        host_types,
        host_type_regex: Some("normal".to_string()),
        suites,
    }
}

fn bench_schema_resolution(c: &mut Criterion) {
    c.bench_function("schema_resolve_database", |b| {
        b.iter(|| {
            let raw: serde_yaml::Value = serde_yaml::from_str(black_box(DATABASE_YAML)).unwrap();
            database_schema().resolve(raw, &Context::new(".")).unwrap()
        })
    });
}

fn bench_compose(c: &mut Criterion) {
    let database = synthetic_database(8, 16);
    let target = Target::new("mainline", "x86_64", None, None);
    let options = JobOptions::default();

    c.bench_function("compose_job_128_cases", |b| {
        b.iter(|| compose_job(black_box(&database), &target, &options).unwrap())
    });
}

fn bench_render(c: &mut Criterion) {
    let database = synthetic_database(8, 16);
    let target = Target::new("mainline", "x86_64", None, None);
    let (job, _summary) = compose_job(&database, &target, &JobOptions::default()).unwrap();

    c.bench_function("render_job_128_cases", |b| {
        b.iter(|| render_job(black_box(&job)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_schema_resolution,
    bench_compose,
    bench_render
);
criterion_main!(benches);
