use ahash::HashMap;
use librecmatch_macros::similarity_algorithm;

use crate::{model::FieldConfig, similarity::Similarity};

#[similarity_algorithm(NGram, name = "n-gram")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  dice_coefficient(lhs, rhs, config.ngram_size())
}

/// Character n-grams of a string, or the whole string when it is shorter than `n`.
fn ngrams(value: &str, n: usize) -> Vec<String> {
  let chars = value.chars().collect::<Vec<_>>();

  if chars.len() < n {
    return vec![value.to_string()];
  }

  chars.windows(n).map(|window| window.iter().collect()).collect()
}

/// Dice coefficient over character n-gram multisets.
pub(crate) fn dice_coefficient(lhs: &str, rhs: &str, n: usize) -> f64 {
  if lhs == rhs {
    return 1.0;
  }

  let lhs_grams = ngrams(lhs, n);
  let rhs_grams = ngrams(rhs, n);

  let mut counts: HashMap<&str, usize> = HashMap::default();

  for gram in &lhs_grams {
    *counts.entry(gram.as_str()).or_insert(0) += 1;
  }

  let mut intersection = 0;

  for gram in &rhs_grams {
    if let Some(count) = counts.get_mut(gram.as_str())
      && *count > 0
    {
      *count -= 1;
      intersection += 1;
    }
  }

  (2 * intersection) as f64 / (lhs_grams.len() + rhs_grams.len()) as f64
}

#[cfg(test)]
mod tests {
  use float_cmp::assert_approx_eq;
  use serde_json::json;

  use crate::{
    model::FieldConfig,
    similarity::{Similarity, matchers::ngram::NGram},
  };

  #[test]
  fn ngrams() {
    assert_eq!(super::ngrams("night", 2), ["ni", "ig", "gh", "ht"]);
    assert_eq!(super::ngrams("a", 2), ["a"]);
    assert_eq!(super::ngrams("", 2), [""]);
  }

  #[test]
  fn dice_coefficient() {
    assert_approx_eq!(f64, super::dice_coefficient("night", "nacht", 2), 0.25, epsilon = 0.0001);
    assert_approx_eq!(f64, super::dice_coefficient("aaaa", "aa", 2), 0.5, epsilon = 0.0001);
    assert_eq!(super::dice_coefficient("a", "a", 2), 1.0);
    assert_eq!(super::dice_coefficient("a", "b", 2), 0.0);
    assert_eq!(super::dice_coefficient("", "abc", 2), 0.0);
  }

  #[test]
  fn configured_size() {
    let config = FieldConfig::builder().field("code").params([("n".to_string(), json!(3))].into_iter().collect()).build();

    assert_approx_eq!(f64, NGram.similarity("abcde", "abcdf", &config), 2.0 * 2.0 / 6.0, epsilon = 0.0001);
  }
}
