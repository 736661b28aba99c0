use librecmatch::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("could not read {0}: {1}")]
  InputError(String, String),
  #[error("invalid match rule: {0}")]
  RuleError(String),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}

impl From<RecmatchError> for AppError {
  fn from(value: RecmatchError) -> Self {
    match value {
      RecmatchError::ConfigError(err) => AppError::ConfigError(err),
      RecmatchError::InvalidRule(err) => AppError::RuleError(err),
      RecmatchError::DuplicateRule(id) => AppError::RuleError(format!("rule {id} is defined more than once")),
      RecmatchError::OtherError(err) => AppError::OtherError(err),
    }
  }
}
