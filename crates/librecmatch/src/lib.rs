//! Probabilistic record matching and deduplication.
//!
//! Records are plain JSON objects. A [`MatchRule`](prelude::MatchRule) lists
//! the fields to compare, the similarity algorithm and weight for each of
//! them, and how duplicates should be merged. The [`Recmatch`](prelude::Recmatch)
//! engine scores candidate pairs, groups transitively matching records into
//! clusters and produces one survivor record per cluster.
//!
//! Comparisons never fail: missing rules, missing custom matchers and
//! malformed values all degrade to empty results or zero scores. The only
//! errors are raised when registering invalid rules.

mod blocking;
mod clustering;
mod comparator;
mod engine;
mod error;
mod merge;
mod model;
mod preprocess;
mod registry;
mod similarity;

#[cfg(test)]
mod tests;

pub mod prelude {
  pub use crate::engine::{Recmatch, RecmatchConfig};
  pub use crate::error::RecmatchError;
  pub use crate::model::{
    Algorithm, Classification, ClassificationCounts, DeduplicationResult, FieldConfig, FieldMatchScore, MatchCluster, MatchPair, MatchResult, MatchRule, MergeStrategy, Preprocess, Record,
  };
  pub use crate::registry::{CustomMatcher, Registry};
}

pub use prelude::*;
