use std::{
  collections::HashMap,
  fmt,
  sync::{Arc, PoisonError, RwLock},
};

use ahash::RandomState;
use validator::Validate;

use crate::{error::RecmatchError, model::MatchRule};

/// A pluggable similarity function, expected to return a score in `[0, 1]`.
///
/// Scores outside of that range are clamped, `NaN` is read as zero.
pub type CustomMatcher = Arc<dyn Fn(&str, &str) -> f64 + Send + Sync>;

pub(crate) type CustomMatchers = HashMap<String, CustomMatcher, RandomState>;

/// Process-local store of match rules and custom matchers.
///
/// The registry is shared by every clone of the engine it is given to and can
/// be used from multiple threads. Nothing is persisted.
#[derive(Default)]
pub struct Registry {
  rules: RwLock<HashMap<String, Arc<MatchRule>, RandomState>>,
  matchers: RwLock<CustomMatchers>,
}

impl fmt::Debug for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registry").field("rules", &self.rule_ids()).field("matchers", &self.custom_matchers()).finish()
  }
}

impl Registry {
  /// Register a new rule.
  ///
  /// Fails if the rule does not validate, or if a rule with the same id is
  /// already registered. Use [`Registry::replace_rule`] to overwrite a rule.
  pub fn register_rule(&self, rule: MatchRule) -> Result<(), RecmatchError> {
    rule.validate()?;

    let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);

    if rules.contains_key(&rule.id) {
      return Err(RecmatchError::DuplicateRule(rule.id));
    }

    tracing::debug!(rule_id = %rule.id, fields = rule.fields.len(), "registered match rule");

    rules.insert(rule.id.clone(), Arc::new(rule));

    Ok(())
  }

  /// Register a rule, replacing any rule with the same id. Returns the replaced rule.
  pub fn replace_rule(&self, rule: MatchRule) -> Result<Option<Arc<MatchRule>>, RecmatchError> {
    rule.validate()?;

    tracing::debug!(rule_id = %rule.id, fields = rule.fields.len(), "replaced match rule");

    Ok(self.rules.write().unwrap_or_else(PoisonError::into_inner).insert(rule.id.clone(), Arc::new(rule)))
  }

  pub fn unregister_rule(&self, id: &str) -> Option<Arc<MatchRule>> {
    self.rules.write().unwrap_or_else(PoisonError::into_inner).remove(id)
  }

  pub fn get_rule(&self, id: &str) -> Option<Arc<MatchRule>> {
    self.rules.read().unwrap_or_else(PoisonError::into_inner).get(id).cloned()
  }

  /// All registered rules, ordered by id.
  pub fn list_rules(&self) -> Vec<Arc<MatchRule>> {
    let mut rules = self.rules.read().unwrap_or_else(PoisonError::into_inner).values().cloned().collect::<Vec<_>>();

    rules.sort_by(|lhs, rhs| lhs.id.cmp(&rhs.id));
    rules
  }

  fn rule_ids(&self) -> Vec<String> {
    self.list_rules().iter().map(|rule| rule.id.clone()).collect()
  }

  /// Register a similarity function under `name`, replacing any previous one.
  pub fn register_custom_matcher<F>(&self, name: impl Into<String>, matcher: F)
  where
    F: Fn(&str, &str) -> f64 + Send + Sync + 'static,
  {
    self.matchers.write().unwrap_or_else(PoisonError::into_inner).insert(name.into(), Arc::new(matcher));
  }

  pub fn unregister_custom_matcher(&self, name: &str) -> bool {
    self.matchers.write().unwrap_or_else(PoisonError::into_inner).remove(name).is_some()
  }

  /// Names of the registered custom matchers, sorted.
  pub fn custom_matchers(&self) -> Vec<String> {
    let mut names = self.matchers.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect::<Vec<_>>();

    names.sort();
    names
  }

  // Taken once per operation so that no lock is held while comparing records.
  pub(crate) fn matchers_snapshot(&self) -> CustomMatchers {
    self.matchers.read().unwrap_or_else(PoisonError::into_inner).clone()
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    error::RecmatchError,
    model::{FieldConfig, MatchRule},
  };

  use super::Registry;

  fn rule(id: &str) -> MatchRule {
    MatchRule::builder().id(id).fields(vec![FieldConfig::builder().field("name").build()]).build()
  }

  #[test]
  fn rule_lifecycle() {
    let registry = Registry::default();

    registry.register_rule(rule("b")).unwrap();
    registry.register_rule(rule("a")).unwrap();

    assert!(matches!(registry.register_rule(rule("a")), Err(RecmatchError::DuplicateRule(id)) if id == "a"));
    assert_eq!(registry.get_rule("a").map(|rule| rule.id.clone()), Some("a".to_string()));
    assert_eq!(registry.list_rules().iter().map(|rule| rule.id.as_str()).collect::<Vec<_>>(), ["a", "b"]);

    assert!(registry.unregister_rule("a").is_some());
    assert!(registry.unregister_rule("a").is_none());
    assert!(registry.get_rule("a").is_none());
  }

  #[test]
  fn replace_rule() {
    let registry = Registry::default();

    assert!(registry.replace_rule(rule("a")).unwrap().is_none());

    let mut updated = rule("a");
    updated.threshold = 0.5;

    assert!(registry.replace_rule(updated).unwrap().is_some());
    assert_eq!(registry.get_rule("a").unwrap().threshold, 0.5);
  }

  #[test]
  fn invalid_rules() {
    let registry = Registry::default();

    let mut invalid = rule("a");
    invalid.threshold = 1.5;

    assert!(matches!(registry.register_rule(invalid), Err(RecmatchError::InvalidRule(_))));
    assert!(matches!(registry.register_rule(rule("")), Err(RecmatchError::InvalidRule(_))));

    let negative = MatchRule::builder().id("neg").fields(vec![FieldConfig::builder().field("name").weight(-1.0).build()]).build();

    assert!(matches!(registry.register_rule(negative), Err(RecmatchError::InvalidRule(_))));
    assert!(registry.list_rules().is_empty());
  }

  #[test]
  fn custom_matcher_lifecycle() {
    let registry = Registry::default();

    registry.register_custom_matcher("always", |_, _| 1.0);
    registry.register_custom_matcher("never", |_, _| 0.0);

    assert_eq!(registry.custom_matchers(), ["always", "never"]);
    assert_eq!(registry.matchers_snapshot().get("always").map(|matcher| matcher("a", "b")), Some(1.0));

    assert!(registry.unregister_custom_matcher("always"));
    assert!(!registry.unregister_custom_matcher("always"));
    assert_eq!(registry.custom_matchers(), ["never"]);
  }
}
