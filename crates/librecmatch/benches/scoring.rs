use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use librecmatch::prelude::*;
use serde_json::json;

fn records() -> Vec<Record> {
  let names = ["Jonathan Smith", "Jonathon Smith", "Mary Jones", "Marie Jones", "Peter Parker", "Pete Parker", "Bruce Wayne", "Bruse Wayne"];

  (0..500)
    .map(|i| {
      Record::builder()
        .fields(&[
          ("name", json!(names[i % names.len()])),
          ("email", json!(format!("user{}@test.com", i % 50))),
          ("country", json!(["FR", "DE", "US", "ES"][i % 4])),
        ])
        .build()
    })
    .collect()
}

fn rule(algorithm: Algorithm, blocking: bool) -> MatchRule {
  MatchRule::builder()
    .id("bench")
    .threshold(0.85)
    .blocking_fields(if blocking { vec!["country".to_string()] } else { vec![] })
    .fields(vec![
      FieldConfig::builder().field("name").algorithm(algorithm).weight(2.0).build(),
      FieldConfig::builder().field("email").build(),
    ])
    .build()
}

fn compare_values(c: &mut Criterion) {
  let engine = Recmatch::new().build();

  for algorithm in [Algorithm::EditDistance, Algorithm::JaroWinkler, Algorithm::DoubleMetaphone, Algorithm::TokenSet, Algorithm::FuzzyComposite] {
    let config = FieldConfig::builder().field("name").algorithm(algorithm).build();

    c.bench_function(&format!("compare_values/{algorithm}"), |b| {
      b.iter(|| black_box(engine.compare_values(&json!("Jonathan Smith"), &json!("Smith Jonathon"), &config)))
    });
  }
}

fn find_matches(c: &mut Criterion) {
  let records = records();
  let engine = Recmatch::new().build();
  let sequential = Recmatch::new().config(RecmatchConfig { parallel: false, ..Default::default() }).build();

  c.bench_function("find_matches/blocked", |b| b.iter(|| black_box(engine.find_matches_with_rule(&records, &rule(Algorithm::JaroWinkler, true)))));
  c.bench_function("find_matches/unblocked", |b| b.iter(|| black_box(engine.find_matches_with_rule(&records, &rule(Algorithm::JaroWinkler, false)))));
  c.bench_function("find_matches/sequential", |b| b.iter(|| black_box(sequential.find_matches_with_rule(&records, &rule(Algorithm::JaroWinkler, false)))));
}

fn deduplicate(c: &mut Criterion) {
  let records = records();
  let engine = Recmatch::new().build();

  c.bench_function("deduplicate", |b| b.iter(|| black_box(engine.deduplicate_with_rule(&records, &rule(Algorithm::FuzzyComposite, true)))));
}

criterion_group!(benches, compare_values, find_matches, deduplicate);
criterion_main!(benches);
