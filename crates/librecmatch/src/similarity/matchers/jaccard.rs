use ahash::HashSet;
use librecmatch_macros::similarity_algorithm;

use crate::{model::FieldConfig, similarity::Similarity};

#[similarity_algorithm(Jaccard, name = "jaccard")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  jaccard_similarity(lhs, rhs)
}

/// Jaccard index of the whitespace-separated token sets.
pub(crate) fn jaccard_similarity(lhs: &str, rhs: &str) -> f64 {
  let lhs = lhs.split_whitespace().collect::<HashSet<_>>();
  let rhs = rhs.split_whitespace().collect::<HashSet<_>>();

  if lhs.is_empty() && rhs.is_empty() {
    return 1.0;
  }

  let union = lhs.union(&rhs).count();

  lhs.intersection(&rhs).count() as f64 / union as f64
}
