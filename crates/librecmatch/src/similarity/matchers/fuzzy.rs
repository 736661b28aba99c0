use librecmatch_macros::similarity_algorithm;

use crate::{
  model::FieldConfig,
  similarity::{
    Similarity,
    matchers::{jaro_winkler::jaro_winkler_similarity, levenshtein::levenshtein_similarity, token::token_sort_similarity},
  },
};

#[similarity_algorithm(FuzzyComposite, name = "fuzzy-composite")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  levenshtein_similarity(lhs, rhs).max(jaro_winkler_similarity(lhs, rhs)).max(token_sort_similarity(lhs, rhs))
}

#[cfg(test)]
mod tests {
  use float_cmp::assert_approx_eq;

  use crate::{
    model::FieldConfig,
    similarity::{
      Similarity,
      matchers::{fuzzy::FuzzyComposite, jaro_winkler::jaro_winkler_similarity},
    },
  };

  #[test]
  fn best_of_all() {
    let config = FieldConfig::builder().field("name").build();

    assert_eq!(FuzzyComposite.similarity("john smith", "smith john", &config), 1.0);
    assert_approx_eq!(f64, FuzzyComposite.similarity("martha", "marhta", &config), jaro_winkler_similarity("martha", "marhta"), epsilon = 0.0001);
    assert_eq!(FuzzyComposite.similarity("abc", "xyz", &config), 0.0);
  }
}
