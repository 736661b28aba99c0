#[derive(Debug, thiserror::Error)]
pub enum RecmatchError {
  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("invalid rule: {0}")]
  InvalidRule(String),
  #[error("a rule with id '{0}' is already registered")]
  DuplicateRule(String),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for RecmatchError {
  fn from(errors: validator::ValidationErrors) -> Self {
    RecmatchError::InvalidRule(errors.to_string())
  }
}
