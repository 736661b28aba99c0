use std::{
  fs,
  io::{self, Read},
  sync::Arc,
};

use librecmatch::prelude::*;
use serde::Serialize;

use crate::{
  config::{Config, Mode},
  errors::AppError,
};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
  Matches(MatchResult),
  Deduplication(DeduplicationResult),
}

/// Load rules and records as configured, and run the selected operation.
#[tracing::instrument(skip_all, fields(rules = %config.rules_path, input = %config.input_path, mode = ?config.mode))]
pub fn run(config: &Config) -> Result<Output, AppError> {
  let engine = Recmatch::new()
    .config(RecmatchConfig {
      parallel: config.parallel,
      block_size_warning: config.block_size_warning,
    })
    .build();

  for rule in load_rules(&config.rules_path)? {
    engine.register_rule(rule)?;
  }

  let rule = select_rule(&engine, config.rule_id.as_deref())?;
  let records = load_records(&config.input_path)?;

  tracing::info!(rule_id = %rule.id, records = records.len(), "loaded records");

  Ok(match config.mode {
    Mode::Match => Output::Matches(engine.find_matches(&records, &rule.id)),
    Mode::Dedupe => Output::Deduplication(engine.deduplicate(&records, &rule.id)),
  })
}

fn select_rule(engine: &Recmatch, rule_id: Option<&str>) -> Result<Arc<MatchRule>, AppError> {
  match rule_id {
    Some(id) => engine.get_rule(id).ok_or_else(|| AppError::ConfigError(format!("rule {id} is not defined"))),

    None => match engine.list_rules().as_slice() {
      [rule] => Ok(rule.clone()),
      [] => Err(AppError::ConfigError("no match rule is defined".into())),
      _ => Err(AppError::ConfigError("RULE_ID is required when several rules are defined".into())),
    },
  }
}

fn read(path: &str) -> Result<String, AppError> {
  let contents = match path {
    "-" => {
      let mut contents = String::new();
      io::stdin().read_to_string(&mut contents).map(|_| contents)
    }

    path => fs::read_to_string(path),
  };

  contents.map_err(|err| AppError::InputError(path.to_string(), err.to_string()))
}

/// Read a list of rules from a YAML (or JSON) document.
pub fn load_rules(path: &str) -> Result<Vec<MatchRule>, AppError> {
  serde_yaml::from_str(&read(path)?).map_err(|err| AppError::RuleError(err.to_string()))
}

/// Read a JSON array of records.
pub fn load_records(path: &str) -> Result<Vec<Record>, AppError> {
  serde_json::from_str(&read(path)?).map_err(|err| AppError::InputError(path.to_string(), err.to_string()))
}
