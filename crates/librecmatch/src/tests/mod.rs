use serde_json::{Value, json};

use crate::model::{FieldConfig, MatchRule, Record};

#[bon::builder]
pub fn r(#[builder(start_fn)] name: &str, email: Option<&str>, extra: Option<&[(&str, Value)]>) -> Record {
  let mut record = Record::new();
  record.insert("name", name);

  if let Some(email) = email {
    record.insert("email", email);
  }

  for (field, value) in extra.unwrap_or_default() {
    record.insert(*field, value.clone());
  }

  record
}

pub fn people() -> Vec<Record> {
  vec![
    r("Alice").email("a@test.com").call(),
    r("Bob").email("b@test.com").call(),
    r("Alice").email("a@test.com").extra(&[("status", json!("active"))]).call(),
  ]
}

pub fn exact_rule() -> MatchRule {
  MatchRule::builder()
    .id("exact")
    .name("Exact name and email")
    .threshold(1.0)
    .fields(vec![
      FieldConfig::builder().field("name").weight(0.5).build(),
      FieldConfig::builder().field("email").weight(0.5).build(),
    ])
    .build()
}
