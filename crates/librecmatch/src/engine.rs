use std::{sync::Arc, time::Instant};

use bon::bon;
use itertools::Itertools;
use jiff::Timestamp;
use metrics::{counter, histogram};
use rayon::prelude::*;
use serde_json::Value;
use tracing::instrument;

use crate::{
  blocking, clustering, comparator,
  error::RecmatchError,
  merge,
  model::{Classification, ClassificationCounts, DeduplicationResult, FieldConfig, MatchPair, MatchResult, MatchRule, Record},
  registry::Registry,
  similarity,
};

#[derive(Clone, Debug)]
pub struct RecmatchConfig {
  /// Compare blocks on the rayon thread pool.
  pub parallel: bool,
  /// Log a warning for blocks holding more records than this.
  pub block_size_warning: usize,
}

impl Default for RecmatchConfig {
  fn default() -> Self {
    Self {
      parallel: true,
      block_size_warning: 5000,
    }
  }
}

/// The main entrypoint of the matching engine.
///
/// It holds a [`Registry`] of match rules and custom matchers, and runs
/// comparisons against them. Clones share the same registry and can be sent
/// across threads.
///
/// Every matching operation is fail-soft: an unknown or disabled rule yields
/// an empty result, an unregistered custom matcher scores zero, unknown
/// preprocessing steps are ignored and unparseable timestamps are skipped.
/// Data quality issues lower scores, they never surface as errors. Only rule
/// registration can fail.
///
/// # Examples
///
/// ```rust
/// use librecmatch::prelude::*;
/// use serde_json::json;
///
/// let engine = Recmatch::new().build();
///
/// engine
///   .register_rule(
///     MatchRule::builder()
///       .id("people")
///       .threshold(1.0)
///       .fields(vec![
///         FieldConfig::builder().field("name").weight(0.5).build(),
///         FieldConfig::builder().field("email").weight(0.5).build(),
///       ])
///       .build(),
///   )
///   .unwrap();
///
/// let records = vec![
///   Record::builder().fields(&[("name", json!("Alice")), ("email", json!("a@test.com"))]).build(),
///   Record::builder().fields(&[("name", json!("Bob")), ("email", json!("b@test.com"))]).build(),
///   Record::builder().fields(&[("name", json!("Alice")), ("email", json!("a@test.com"))]).build(),
/// ];
///
/// let result = engine.deduplicate(&records, "people");
///
/// assert_eq!(result.unique_records, 2);
/// assert_eq!(result.total_duplicates, 1);
/// ```
#[derive(Clone, Debug)]
pub struct Recmatch {
  config: RecmatchConfig,
  registry: Arc<Registry>,
}

#[bon]
impl Recmatch {
  /// Create a new engine.
  ///
  /// Without an explicit registry, the engine starts with an empty one.
  #[allow(clippy::new_ret_no_self)]
  #[builder(start_fn = new, finish_fn = build)]
  pub fn _new(#[builder(default)] config: RecmatchConfig, #[builder(default)] registry: Arc<Registry>) -> Recmatch {
    Recmatch { config, registry }
  }
}

impl Recmatch {
  pub fn config(&self) -> &RecmatchConfig {
    &self.config
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  /// Register a new rule, failing if its id is already taken or it does not validate.
  pub fn register_rule(&self, rule: MatchRule) -> Result<(), RecmatchError> {
    self.registry.register_rule(rule)
  }

  /// Register a rule, replacing the rule with the same id if there is one.
  pub fn replace_rule(&self, rule: MatchRule) -> Result<Option<Arc<MatchRule>>, RecmatchError> {
    self.registry.replace_rule(rule)
  }

  pub fn unregister_rule(&self, id: &str) -> Option<Arc<MatchRule>> {
    self.registry.unregister_rule(id)
  }

  pub fn get_rule(&self, id: &str) -> Option<Arc<MatchRule>> {
    self.registry.get_rule(id)
  }

  pub fn list_rules(&self) -> Vec<Arc<MatchRule>> {
    self.registry.list_rules()
  }

  /// Register a similarity function used by fields with the `custom` algorithm.
  pub fn register_custom_matcher<F>(&self, name: impl Into<String>, matcher: F)
  where
    F: Fn(&str, &str) -> f64 + Send + Sync + 'static,
  {
    self.registry.register_custom_matcher(name, matcher)
  }

  pub fn unregister_custom_matcher(&self, name: &str) -> bool {
    self.registry.unregister_custom_matcher(name)
  }

  /// Find matching pairs and clusters among records, using a registered rule.
  ///
  /// An unknown rule id returns an empty result.
  #[instrument(name = "find_matches", skip_all, fields(rule_id = rule_id, records = records.len()))]
  pub fn find_matches(&self, records: &[Record], rule_id: &str) -> MatchResult {
    match self.registry.get_rule(rule_id) {
      Some(rule) => self.find_matches_with_rule(records, &rule),

      None => {
        tracing::warn!(rule_id, "unknown match rule");

        MatchResult::empty(rule_id, "", records.len())
      }
    }
  }

  /// Find matching pairs and clusters among records, using the given rule.
  pub fn find_matches_with_rule(&self, records: &[Record], rule: &MatchRule) -> MatchResult {
    let then = Instant::now();

    if !rule.enabled {
      tracing::warn!(rule_id = %rule.id, "match rule is disabled");

      return MatchResult::empty(&rule.id, &rule.name, records.len());
    }

    let pairs = self.match_pairs(records, rule);
    let clusters = clustering::cluster(records.len(), &pairs, |members| merge::select_master(records, members, rule.merge_strategy));

    let elapsed = then.elapsed();

    histogram!("recmatch_matching_latency_seconds").record(elapsed.as_secs_f64());
    counter!("recmatch_clusters_total").increment(clusters.len() as u64);

    tracing::debug!(rule_id = %rule.id, pairs = pairs.len(), clusters = clusters.len(), "matched records");

    MatchResult {
      rule_id: rule.id.clone(),
      rule_name: rule.name.clone(),
      total_records: records.len(),
      counts: ClassificationCounts::tally(&pairs),
      pairs,
      clusters,
      duration_ms: elapsed.as_secs_f64() * 1000.0,
      timestamp: Timestamp::now(),
    }
  }

  /// Deduplicate records using a registered rule.
  ///
  /// An unknown rule id leaves every record as its own survivor.
  #[instrument(name = "deduplicate", skip_all, fields(rule_id = rule_id, records = records.len()))]
  pub fn deduplicate(&self, records: &[Record], rule_id: &str) -> DeduplicationResult {
    match self.registry.get_rule(rule_id) {
      Some(rule) => self.deduplicate_with_rule(records, &rule),

      None => {
        tracing::warn!(rule_id, "unknown match rule");

        let then = Instant::now();

        deduplication_result(records, MatchResult::empty(rule_id, "", records.len()), records.to_vec(), then)
      }
    }
  }

  /// Deduplicate records using the given rule.
  pub fn deduplicate_with_rule(&self, records: &[Record], rule: &MatchRule) -> DeduplicationResult {
    let then = Instant::now();
    let matches = self.find_matches_with_rule(records, rule);
    let survivors = merge::survivors(records, &matches.clusters, rule.merge_strategy);

    deduplication_result(records, matches, survivors, then)
  }

  /// Compare two records directly, without blocking.
  ///
  /// The returned pair uses index `0` for `lhs` and `1` for `rhs`, and is
  /// returned even when classified as a non-match.
  #[instrument(name = "compare_records", skip_all, fields(rule_id = %rule.id))]
  pub fn compare_records(&self, lhs: &Record, rhs: &Record, rule: &MatchRule) -> MatchPair {
    comparator::compare(0, 1, lhs, rhs, rule, &self.registry.matchers_snapshot())
  }

  /// Similarity of two values under a single field configuration.
  pub fn compare_values(&self, lhs: &Value, rhs: &Value, config: &FieldConfig) -> f64 {
    similarity::score_values(lhs, rhs, config, &self.registry.matchers_snapshot())
  }

  fn match_pairs(&self, records: &[Record], rule: &MatchRule) -> Vec<MatchPair> {
    let matchers = self.registry.matchers_snapshot();
    let blocks = blocking::blocks(records, &rule.blocking_fields);

    for block in blocks.iter().filter(|block| block.len() > self.config.block_size_warning) {
      tracing::warn!(rule_id = %rule.id, size = block.len(), "large comparison block, consider adding blocking fields");
    }

    let compare_block = |block: &Vec<usize>| -> Vec<MatchPair> {
      blocking::candidate_pairs(block)
        .map(|(lhs, rhs)| comparator::compare(lhs, rhs, &records[lhs], &records[rhs], rule, &matchers))
        .filter(|pair| pair.classification != Classification::NonMatch)
        .inspect(|pair| histogram!("recmatch_pair_scores").record(pair.score))
        .collect()
    };

    let partials: Vec<Vec<MatchPair>> = if self.config.parallel {
      blocks.par_iter().map(compare_block).collect()
    } else {
      blocks.iter().map(compare_block).collect()
    };

    let mut pairs = partials.into_iter().flatten().collect_vec();

    if let Some(max_pairs) = rule.max_pairs {
      pairs.sort_by(|lhs, rhs| rhs.score.total_cmp(&lhs.score));
      pairs.truncate(max_pairs);
    }

    pairs
  }
}

fn deduplication_result(records: &[Record], matches: MatchResult, survivors: Vec<Record>, then: Instant) -> DeduplicationResult {
  DeduplicationResult {
    rule_id: matches.rule_id,
    rule_name: matches.rule_name,
    total_records: records.len(),
    unique_records: survivors.len(),
    total_duplicates: records.len().saturating_sub(survivors.len()),
    duplicate_groups: matches.clusters.len(),
    clusters: matches.clusters,
    survivors,
    duration_ms: then.elapsed().as_secs_f64() * 1000.0,
    timestamp: Timestamp::now(),
  }
}
