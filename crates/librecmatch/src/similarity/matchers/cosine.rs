use ahash::HashMap;
use librecmatch_macros::similarity_algorithm;

use crate::{model::FieldConfig, similarity::Similarity};

#[similarity_algorithm(Cosine, name = "cosine")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  cosine_similarity(lhs, rhs)
}

fn frequencies(value: &str) -> HashMap<char, f64> {
  let mut counts: HashMap<char, f64> = HashMap::default();

  for c in value.chars() {
    *counts.entry(c).or_insert(0.0) += 1.0;
  }

  counts
}

/// Cosine of the angle between the character frequency vectors of both strings.
pub(crate) fn cosine_similarity(lhs: &str, rhs: &str) -> f64 {
  if lhs == rhs {
    return 1.0;
  }

  let lhs = frequencies(lhs);
  let rhs = frequencies(rhs);

  let dot = lhs.iter().filter_map(|(c, count)| rhs.get(c).map(|other| count * other)).sum::<f64>();
  let lhs_norm = lhs.values().map(|count| count * count).sum::<f64>().sqrt();
  let rhs_norm = rhs.values().map(|count| count * count).sum::<f64>().sqrt();

  if lhs_norm == 0.0 || rhs_norm == 0.0 {
    return 0.0;
  }

  (dot / (lhs_norm * rhs_norm)).min(1.0)
}
