use itertools::Itertools;
use librecmatch_macros::similarity_algorithm;

use crate::{
  model::FieldConfig,
  similarity::{Similarity, matchers::levenshtein::levenshtein_similarity},
};

#[similarity_algorithm(TokenSort, name = "token-sort")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  token_sort_similarity(lhs, rhs)
}

#[similarity_algorithm(TokenSet, name = "token-set")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  token_set_similarity(lhs, rhs)
}

fn sorted_tokens(value: &str) -> String {
  value.split_whitespace().sorted_unstable().join(" ")
}

/// Edit distance similarity of both values with their tokens sorted alphabetically.
pub(crate) fn token_sort_similarity(lhs: &str, rhs: &str) -> f64 {
  levenshtein_similarity(&sorted_tokens(lhs), &sorted_tokens(rhs))
}

fn join_parts(intersection: &str, rest: &[&str]) -> String {
  match (intersection.is_empty(), rest.is_empty()) {
    (_, true) => intersection.to_string(),
    (true, false) => rest.join(" "),
    (false, false) => format!("{intersection} {}", rest.join(" ")),
  }
}

/// Best edit distance similarity between the shared tokens and each side's
/// reconstruction (shared tokens followed by the tokens only found on that side).
pub(crate) fn token_set_similarity(lhs: &str, rhs: &str) -> f64 {
  let lhs_tokens = lhs.split_whitespace().sorted_unstable().dedup().collect::<Vec<_>>();
  let rhs_tokens = rhs.split_whitespace().sorted_unstable().dedup().collect::<Vec<_>>();

  if lhs_tokens.is_empty() && rhs_tokens.is_empty() {
    return 1.0;
  }
  if lhs_tokens.is_empty() || rhs_tokens.is_empty() {
    return 0.0;
  }

  let intersection = lhs_tokens.iter().filter(|token| rhs_tokens.contains(token)).join(" ");
  let lhs_only = lhs_tokens.iter().copied().filter(|token| !rhs_tokens.contains(token)).collect::<Vec<_>>();
  let rhs_only = rhs_tokens.iter().copied().filter(|token| !lhs_tokens.contains(token)).collect::<Vec<_>>();

  let lhs_combined = join_parts(&intersection, &lhs_only);
  let rhs_combined = join_parts(&intersection, &rhs_only);

  let combined = levenshtein_similarity(&lhs_combined, &rhs_combined);

  if intersection.is_empty() {
    return combined;
  }

  levenshtein_similarity(&intersection, &lhs_combined)
    .max(levenshtein_similarity(&intersection, &rhs_combined))
    .max(combined)
}
