use std::{
  env::{self, VarError},
  fmt::Display,
  str::FromStr,
};

use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct Config {
  pub env: Env,

  // Inputs
  pub rules_path: String,
  pub input_path: String,
  pub rule_id: Option<String>,
  pub mode: Mode,

  // Engine settings
  pub parallel: bool,
  pub block_size_warning: usize,
}

impl Config {
  pub fn from_env() -> Result<Config, AppError> {
    let config = Config {
      env: Env::from(env::var("ENV").unwrap_or("dev".into())),
      rules_path: env::var("RULES_PATH").unwrap_or_default(),
      input_path: env::var("INPUT_PATH").unwrap_or("-".into()),
      rule_id: env::var("RULE_ID").ok().filter(|id| !id.is_empty()),
      mode: env::var("MODE").unwrap_or("dedupe".into()).parse()?,
      parallel: parse_env("PARALLEL", true)?,
      block_size_warning: parse_env("BLOCK_SIZE_WARNING", 5000)?,
    };

    if config.rules_path.is_empty() {
      return Err(AppError::ConfigError("RULES_PATH is required".into()));
    }

    Ok(config)
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Env {
  Dev,
  Production,
}

impl From<String> for Env {
  fn from(value: String) -> Self {
    match value.as_ref() {
      "dev" => Env::Dev,
      "production" => Env::Production,
      _ => Env::Dev,
    }
  }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
  Match,
  Dedupe,
}

impl FromStr for Mode {
  type Err = AppError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "match" => Ok(Mode::Match),
      "dedupe" | "deduplicate" => Ok(Mode::Dedupe),
      other => Err(AppError::ConfigError(format!("unsupported mode: {other}"))),
    }
  }
}

pub fn parse_env<T>(name: &str, default: T) -> anyhow::Result<T>
where
  T: FromStr,
  T::Err: Display,
{
  match env::var(name) {
    Ok(value) if value.is_empty() => Ok(default),
    Ok(value) => Ok(value.parse::<T>().map_err(|err| AppError::ConfigError(format!("could not read {name}: {err}")))?),
    Err(err) => match err {
      VarError::NotPresent => Ok(default),
      _ => Err(AppError::ConfigError(format!("could not read {name}: {err}")).into()),
    },
  }
}
