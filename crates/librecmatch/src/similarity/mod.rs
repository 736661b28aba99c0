pub(crate) mod matchers;

use serde_json::Value;

use crate::{
  model::{Algorithm, FieldConfig, value_text},
  preprocess,
  registry::CustomMatchers,
};

use self::matchers::{
  cosine::Cosine,
  exact::Exact,
  fuzzy::FuzzyComposite,
  jaccard::Jaccard,
  jaro_winkler::JaroWinkler,
  levenshtein::EditDistance,
  ngram::NGram,
  phonetic::{DoubleMetaphoneMatch, MetaphoneMatch, SoundexMatch},
  token::{TokenSet, TokenSort},
};

/// A similarity measure between two preprocessed values, in `[0, 1]`.
pub(crate) trait Similarity: Send + Sync {
  fn name(&self) -> &'static str;
  fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64;
}

impl Algorithm {
  /// Built-in implementation of the algorithm, `None` for custom matchers.
  pub(crate) fn similarity(&self) -> Option<&'static dyn Similarity> {
    match self {
      Algorithm::Exact => Some(&Exact),
      Algorithm::EditDistance => Some(&EditDistance),
      Algorithm::JaroWinkler => Some(&JaroWinkler),
      Algorithm::Soundex => Some(&SoundexMatch),
      Algorithm::Metaphone => Some(&MetaphoneMatch),
      Algorithm::DoubleMetaphone => Some(&DoubleMetaphoneMatch),
      Algorithm::NGram => Some(&NGram),
      Algorithm::Cosine => Some(&Cosine),
      Algorithm::Jaccard => Some(&Jaccard),
      Algorithm::TokenSort => Some(&TokenSort),
      Algorithm::TokenSet => Some(&TokenSet),
      Algorithm::FuzzyComposite => Some(&FuzzyComposite),
      Algorithm::Custom => None,
    }
  }
}

/// Score two raw field values.
///
/// Two missing values are equal, a single missing value never matches.
/// Custom matchers that are not registered score zero.
pub(crate) fn score_values(lhs: &Value, rhs: &Value, config: &FieldConfig, custom: &CustomMatchers) -> f64 {
  let (lhs, rhs) = match (value_text(lhs), value_text(rhs)) {
    (None, None) => return 1.0,
    (Some(lhs), Some(rhs)) => (lhs, rhs),
    _ => return 0.0,
  };

  let lhs = preprocess::prepare(&lhs, config);
  let rhs = preprocess::prepare(&rhs, config);

  let score = match config.algorithm.similarity() {
    Some(algorithm) => {
      let score = algorithm.similarity(&lhs, &rhs, config);

      tracing::trace!(field = %config.field, algorithm = algorithm.name(), score, "computed field similarity");

      score
    }

    None => match custom.get(config.custom_matcher()) {
      Some(matcher) => matcher(&lhs, &rhs),

      None => {
        tracing::warn!(field = %config.field, matcher = config.custom_matcher(), "custom matcher is not registered");

        0.0
      }
    },
  };

  clamp(score)
}

#[inline]
pub(crate) fn clamp(score: f64) -> f64 {
  if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) }
}
