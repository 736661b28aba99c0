use crate::{
  model::{Classification, FieldMatchScore, MatchPair, MatchRule, Record},
  registry::CustomMatchers,
  similarity,
};

/// Compare two records under a rule.
///
/// The aggregate score is the weighted mean of every field similarity. Fields
/// with a negative or non-finite weight do not contribute, and a rule without
/// any positive weight scores zero.
pub(crate) fn compare(lhs_index: usize, rhs_index: usize, lhs: &Record, rhs: &Record, rule: &MatchRule, matchers: &CustomMatchers) -> MatchPair {
  let mut fields = Vec::with_capacity(rule.fields.len());

  let (weighted, total_weight) = rule.fields.iter().fold((0.0f64, 0.0f64), |(weighted, total_weight), config| {
    let (lhs_value, rhs_value) = (lhs.value(&config.field), rhs.value(&config.field));
    let score = similarity::score_values(lhs_value, rhs_value, config, matchers);
    let weight = if config.weight.is_finite() && config.weight > 0.0 { config.weight } else { 0.0 };

    fields.push(FieldMatchScore {
      field: config.field.clone(),
      score,
      algorithm: config.algorithm,
      lhs: lhs_value.clone(),
      rhs: rhs_value.clone(),
    });

    (weighted + (score * weight), total_weight + weight)
  });

  let score = if total_weight > 0.0 { similarity::clamp(weighted / total_weight) } else { 0.0 };

  MatchPair {
    lhs: lhs_index,
    rhs: rhs_index,
    score,
    fields,
    classification: Classification::from_score(score, rule.threshold),
  }
}

#[cfg(test)]
mod tests {
  use float_cmp::assert_approx_eq;
  use serde_json::json;

  use crate::{
    model::{Algorithm, Classification, FieldConfig, MatchRule, Record},
    registry::CustomMatchers,
  };

  fn rule(threshold: f64) -> MatchRule {
    MatchRule::builder()
      .id("people")
      .threshold(threshold)
      .fields(vec![
        FieldConfig::builder().field("name").algorithm(Algorithm::EditDistance).weight(3.0).build(),
        FieldConfig::builder().field("email").algorithm(Algorithm::Exact).weight(1.0).build(),
      ])
      .build()
  }

  #[test]
  fn weighted_score() {
    let lhs = Record::builder().fields(&[("name", json!("kitten")), ("email", json!("k@test.com"))]).build();
    let rhs = Record::builder().fields(&[("name", json!("sitting")), ("email", json!("k@test.com"))]).build();

    let pair = super::compare(3, 7, &lhs, &rhs, &rule(0.6), &CustomMatchers::default());

    assert_eq!((pair.lhs, pair.rhs), (3, 7));
    assert_approx_eq!(f64, pair.score, (3.0 * (4.0 / 7.0) + 1.0) / 4.0, epsilon = 0.0001);
    assert_eq!(pair.classification, Classification::Probable);
    assert_eq!(pair.fields.len(), 2);
    assert_eq!(pair.fields[0].field, "name");
    assert_eq!(pair.fields[0].lhs, json!("kitten"));
    assert_eq!(pair.fields[1].score, 1.0);
  }

  #[test]
  fn identical_records_are_exact() {
    let record = Record::builder().fields(&[("name", json!("Alice")), ("email", json!("a@test.com"))]).build();
    let pair = super::compare(0, 1, &record, &record.clone(), &rule(1.0), &CustomMatchers::default());

    assert_eq!(pair.score, 1.0);
    assert_eq!(pair.classification, Classification::Exact);
  }

  #[test]
  fn zero_weights() {
    let rule = MatchRule::builder()
      .id("weightless")
      .fields(vec![FieldConfig::builder().field("name").weight(0.0).build(), FieldConfig::builder().field("city").weight(-2.0).build()])
      .build();

    let record = Record::builder().fields(&[("name", json!("Alice"))]).build();
    let pair = super::compare(0, 1, &record, &record, &rule, &CustomMatchers::default());

    assert_eq!(pair.score, 0.0);
    assert_eq!(pair.classification, Classification::NonMatch);
  }

  #[test]
  fn score_is_bounded() {
    let rules = [rule(0.0), rule(0.5), rule(1.0)];
    let records = [
      Record::builder().fields(&[("name", json!("Bob"))]).build(),
      Record::builder().fields(&[("name", json!("Robert")), ("email", json!(null))]).build(),
      Record::builder().fields(&[("name", json!(12)), ("email", json!(true))]).build(),
    ];

    for rule in &rules {
      for lhs in &records {
        for rhs in &records {
          let pair = super::compare(0, 1, lhs, rhs, rule, &CustomMatchers::default());

          assert!((0.0..=1.0).contains(&pair.score));
          assert_eq!(pair.classification, Classification::from_score(pair.score, rule.threshold));
        }
      }
    }
  }
}
