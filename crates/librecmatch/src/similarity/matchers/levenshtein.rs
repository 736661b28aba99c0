use librecmatch_macros::similarity_algorithm;
use strsim::levenshtein;

use crate::{model::FieldConfig, similarity::Similarity};

#[similarity_algorithm(EditDistance, name = "edit-distance")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  levenshtein_similarity(lhs, rhs)
}

/// Edit distance normalized by the length of the longest string, in characters.
pub(crate) fn levenshtein_similarity(lhs: &str, rhs: &str) -> f64 {
  if lhs == rhs {
    return 1.0;
  }

  let longest = lhs.chars().count().max(rhs.chars().count());

  1.0 - (levenshtein(lhs, rhs) as f64 / longest as f64)
}
