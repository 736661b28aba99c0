use librecmatch_macros::similarity_algorithm;
use strsim::jaro;

use crate::{model::FieldConfig, similarity::Similarity};

const PREFIX_SCALE: f64 = 0.1;
const MAX_PREFIX: usize = 4;

#[similarity_algorithm(JaroWinkler, name = "jaro-winkler")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  jaro_winkler_similarity(lhs, rhs)
}

/// Jaro similarity with the Winkler common prefix bonus.
///
/// Unlike [`strsim::jaro_winkler`], the prefix bonus is applied regardless of
/// the Jaro score.
pub(crate) fn jaro_winkler_similarity(lhs: &str, rhs: &str) -> f64 {
  let jaro = jaro(lhs, rhs);
  let prefix = lhs.chars().zip(rhs.chars()).take(MAX_PREFIX).take_while(|(l, r)| l == r).count();

  jaro + (prefix as f64 * PREFIX_SCALE * (1.0 - jaro))
}
