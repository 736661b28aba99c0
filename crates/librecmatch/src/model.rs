use std::{collections::HashMap, fmt};

use ahash::RandomState;
use bon::{Builder, bon};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use serde_json::{Map, Number, Value};
use validator::Validate;

const NULL: &Value = &Value::Null;

/// A single input record, as a mapping from field name to JSON value.
///
/// Strings, numbers and booleans are compared through their textual form.
/// `null` and absent fields are both treated as missing values.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
  pub fn new() -> Record {
    Record::default()
  }

  /// Raw value of a field, `null` if the field is absent.
  pub fn value(&self, field: &str) -> &Value {
    self.0.get(field).unwrap_or(NULL)
  }

  /// Textual form of a field, `None` if it is absent or `null`.
  pub fn text(&self, field: &str) -> Option<String> {
    value_text(self.value(field))
  }

  /// Whether the field holds something other than `null` or blank text.
  pub fn is_filled(&self, field: &str) -> bool {
    is_filled(self.value(field))
  }

  pub fn filled_fields(&self) -> usize {
    self.0.values().filter(|value| is_filled(value)).count()
  }

  pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.0.insert(field.into(), value.into())
  }

  pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

#[bon]
impl Record {
  #[builder(finish_fn = build)]
  pub fn builder(fields: &[(&str, Value)]) -> Record {
    fields.iter().map(|(name, value)| (name.to_string(), value.clone())).collect()
  }
}

impl From<Map<String, Value>> for Record {
  fn from(fields: Map<String, Value>) -> Self {
    Record(fields)
  }
}

impl FromIterator<(String, Value)> for Record {
  fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
    Record(iter.into_iter().collect())
  }
}

pub(crate) fn value_text(value: &Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::String(s) => Some(s.clone()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Number(n) => Some(number_text(n)),
    other => Some(other.to_string()),
  }
}

/// Integral floats are written like integers, so `1.0` and `1` read the same.
fn number_text(number: &Number) -> String {
  match number.as_f64() {
    Some(value) if number.is_f64() && value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 => (value as i64).to_string(),
    _ => number.to_string(),
  }
}

pub(crate) fn is_filled(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::String(s) => !s.trim().is_empty(),
    Value::Array(items) => !items.is_empty(),
    Value::Object(fields) => !fields.is_empty(),
    _ => true,
  }
}

/// Similarity algorithms usable on a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Algorithm {
  #[default]
  #[serde(rename = "exact")]
  Exact,
  #[serde(rename = "edit-distance", alias = "levenshtein")]
  EditDistance,
  #[serde(rename = "jaro-winkler")]
  JaroWinkler,
  #[serde(rename = "soundex")]
  Soundex,
  #[serde(rename = "metaphone")]
  Metaphone,
  #[serde(rename = "double-metaphone")]
  DoubleMetaphone,
  #[serde(rename = "n-gram", alias = "ngram")]
  NGram,
  #[serde(rename = "cosine")]
  Cosine,
  #[serde(rename = "jaccard")]
  Jaccard,
  #[serde(rename = "token-sort")]
  TokenSort,
  #[serde(rename = "token-set")]
  TokenSet,
  #[serde(rename = "fuzzy-composite", alias = "fuzzy")]
  FuzzyComposite,
  /// Dispatches to a function registered with
  /// [`Registry::register_custom_matcher`](crate::Registry::register_custom_matcher).
  #[serde(rename = "custom")]
  Custom,
}

impl Algorithm {
  pub fn as_str(&self) -> &'static str {
    match self {
      Algorithm::Exact => "exact",
      Algorithm::EditDistance => "edit-distance",
      Algorithm::JaroWinkler => "jaro-winkler",
      Algorithm::Soundex => "soundex",
      Algorithm::Metaphone => "metaphone",
      Algorithm::DoubleMetaphone => "double-metaphone",
      Algorithm::NGram => "n-gram",
      Algorithm::Cosine => "cosine",
      Algorithm::Jaccard => "jaccard",
      Algorithm::TokenSort => "token-sort",
      Algorithm::TokenSet => "token-set",
      Algorithm::FuzzyComposite => "fuzzy-composite",
      Algorithm::Custom => "custom",
    }
  }
}

impl fmt::Display for Algorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Value transforms applied, in order, before a field is compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Preprocess {
  #[serde(rename = "trim")]
  Trim,
  #[serde(rename = "lowercase", alias = "lower-case")]
  Lowercase,
  #[serde(rename = "remove-punctuation")]
  RemovePunctuation,
  #[serde(rename = "ascii-fold")]
  AsciiFold,
  #[serde(rename = "phonetic-fold", alias = "phonetic")]
  PhoneticFold,
  /// Any step name this version does not know about. Values go through untouched.
  #[serde(rename = "unknown")]
  #[serde(other)]
  Unknown,
}

/// How the survivor of a cluster is chosen and built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum MergeStrategy {
  #[default]
  #[serde(rename = "keep-first")]
  KeepFirst,
  #[serde(rename = "keep-last")]
  KeepLast,
  #[serde(rename = "keep-most-complete")]
  KeepMostComplete,
  #[serde(rename = "keep-most-recent")]
  KeepMostRecent,
  #[serde(rename = "manual")]
  Manual,
  #[serde(rename = "custom")]
  Custom,
}

#[serde_inline_default]
#[derive(Builder, Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
  #[builder(into)]
  #[validate(length(min = 1, message = "field name cannot be empty"))]
  pub field: String,
  #[builder(default)]
  #[serde(default)]
  pub algorithm: Algorithm,
  #[builder(default = 1.0)]
  #[serde_inline_default(1.0)]
  #[validate(range(min = 0.0, message = "field weight cannot be negative"))]
  pub weight: f64,
  /// Accepted for compatibility with existing rule definitions, only the
  /// rule-level threshold is used to classify pairs.
  #[builder(default = 0.8)]
  #[serde_inline_default(0.8)]
  #[validate(range(min = 0.0, max = 1.0, message = "field threshold must be between 0 and 1"))]
  pub threshold: f64,
  #[builder(default)]
  #[serde(default)]
  pub case_sensitive: bool,
  #[builder(default)]
  #[serde(default)]
  pub preprocessing: Vec<Preprocess>,
  #[builder(default)]
  #[serde(default)]
  pub params: HashMap<String, Value, RandomState>,
}

impl FieldConfig {
  /// Character n-gram size, from the `n` parameter.
  pub(crate) fn ngram_size(&self) -> usize {
    match self.params.get("n").and_then(Value::as_u64) {
      Some(n) if n > 0 => n as usize,
      _ => 2,
    }
  }

  /// Name of the custom matcher to use, from the `matcher` parameter or the field name.
  pub(crate) fn custom_matcher(&self) -> &str {
    self.params.get("matcher").and_then(Value::as_str).unwrap_or(&self.field)
  }
}

#[serde_inline_default]
#[derive(Builder, Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchRule {
  #[builder(into)]
  #[validate(length(min = 1, message = "rule id cannot be empty"))]
  pub id: String,
  #[builder(into, default)]
  #[serde(default)]
  pub name: String,
  #[builder(default)]
  #[serde(default)]
  #[validate(nested)]
  pub fields: Vec<FieldConfig>,
  #[builder(default = 0.8)]
  #[serde_inline_default(0.8)]
  #[serde(alias = "overallThreshold")]
  #[validate(range(min = 0.0, max = 1.0, message = "rule threshold must be between 0 and 1"))]
  pub threshold: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_pairs: Option<usize>,
  #[builder(default)]
  #[serde(default)]
  pub blocking_fields: Vec<String>,
  #[builder(default)]
  #[serde(default)]
  pub merge_strategy: MergeStrategy,
  #[builder(default = true)]
  #[serde_inline_default(true)]
  pub enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Classification {
  #[serde(rename = "exact")]
  Exact,
  #[serde(rename = "probable")]
  Probable,
  #[serde(rename = "possible")]
  Possible,
  #[serde(rename = "non-match")]
  NonMatch,
}

impl Classification {
  /// Four-way split of an aggregate score against a rule threshold.
  pub fn from_score(score: f64, threshold: f64) -> Classification {
    if score >= 1.0 {
      Classification::Exact
    } else if score >= threshold {
      Classification::Probable
    } else if score >= 0.8 * threshold {
      Classification::Possible
    } else {
      Classification::NonMatch
    }
  }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FieldMatchScore {
  pub field: String,
  pub score: f64,
  pub algorithm: Algorithm,
  pub lhs: Value,
  pub rhs: Value,
}

/// Comparison outcome of two records, identified by their position in the input.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MatchPair {
  pub lhs: usize,
  pub rhs: usize,
  pub score: f64,
  pub fields: Vec<FieldMatchScore>,
  pub classification: Classification,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MatchCluster {
  pub id: String,
  pub members: Vec<usize>,
  pub master: usize,
  pub confidence: f64,
}

impl MatchCluster {
  pub fn contains(&self, index: usize) -> bool {
    self.members.binary_search(&index).is_ok()
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClassificationCounts {
  pub exact: usize,
  pub probable: usize,
  pub possible: usize,
}

impl ClassificationCounts {
  pub(crate) fn tally(pairs: &[MatchPair]) -> ClassificationCounts {
    pairs.iter().fold(ClassificationCounts::default(), |mut counts, pair| {
      match pair.classification {
        Classification::Exact => counts.exact += 1,
        Classification::Probable => counts.probable += 1,
        Classification::Possible => counts.possible += 1,
        Classification::NonMatch => {}
      }

      counts
    })
  }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
  pub rule_id: String,
  pub rule_name: String,
  pub total_records: usize,
  pub pairs: Vec<MatchPair>,
  pub counts: ClassificationCounts,
  pub clusters: Vec<MatchCluster>,
  pub duration_ms: f64,
  pub timestamp: Timestamp,
}

impl MatchResult {
  pub(crate) fn empty(rule_id: &str, rule_name: &str, total_records: usize) -> MatchResult {
    MatchResult {
      rule_id: rule_id.to_string(),
      rule_name: rule_name.to_string(),
      total_records,
      pairs: Vec::new(),
      counts: ClassificationCounts::default(),
      clusters: Vec::new(),
      duration_ms: 0.0,
      timestamp: Timestamp::now(),
    }
  }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeduplicationResult {
  pub rule_id: String,
  pub rule_name: String,
  pub total_records: usize,
  pub unique_records: usize,
  pub total_duplicates: usize,
  pub duplicate_groups: usize,
  pub clusters: Vec<MatchCluster>,
  pub survivors: Vec<Record>,
  pub duration_ms: f64,
  pub timestamp: Timestamp,
}
