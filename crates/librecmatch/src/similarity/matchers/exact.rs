use librecmatch_macros::similarity_algorithm;

use crate::{model::FieldConfig, similarity::Similarity};

#[similarity_algorithm(Exact, name = "exact")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  if lhs == rhs { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
  use crate::{
    model::FieldConfig,
    similarity::{Similarity, matchers::exact::Exact},
  };

  #[test]
  fn exact() {
    let config = FieldConfig::builder().field("status").build();

    assert_eq!(Exact.similarity("active", "active", &config), 1.0);
    assert_eq!(Exact.similarity("active", "deleted", &config), 0.0);
    assert_eq!(Exact.similarity("", "", &config), 1.0);
  }
}
