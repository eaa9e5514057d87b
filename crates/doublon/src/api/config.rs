use std::{
  env::{self, VarError},
  fmt::Display,
  str::FromStr,
};

use crate::api::errors::AppError;

#[derive(Clone)]
pub struct Config {
  pub env: Env,
  pub listen_addr: String,

  // Catalog
  pub catalog_path: String,

  // Embedding service
  pub embedding_url: String,
  pub embedding_timeout: u64,

  // Match settings
  pub top_n_results: usize,

  // Debugging
  pub enable_prometheus: bool,
}

impl Config {
  pub fn from_env() -> Result<Config, AppError> {
    let config = Config {
      env: Env::from(env::var("ENV").unwrap_or("dev".into())),
      listen_addr: env::var("LISTEN_ADDR").unwrap_or("0.0.0.0:8000".into()),
      catalog_path: env::var("CATALOG_PATH").unwrap_or("catalog.jsonl".into()),
      embedding_url: env::var("EMBEDDING_URL").unwrap_or("http://localhost:8600".into()),
      embedding_timeout: parse_env("EMBEDDING_TIMEOUT_SECS", 5)?,
      top_n_results: parse_env("TOP_N_RESULTS", 10)?,
      enable_prometheus: env::var("ENABLE_PROMETHEUS").unwrap_or_default() == "1",
    };

    if config.top_n_results == 0 {
      return Err(AppError::ConfigError("TOP_N_RESULTS must be a positive number".into()));
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
