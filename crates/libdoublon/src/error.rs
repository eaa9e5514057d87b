#[derive(Debug, thiserror::Error)]
pub enum DoublonError {
  #[error("product not found")]
  NotFound,
  #[error("invalid query: {0}")]
  InvalidQuery(String),
  #[error("invalid merge request: {0}")]
  InvalidMerge(String),
  #[error("record has already been linked")]
  AlreadyLinked,
  #[error("invalid weights: {0}")]
  InvalidWeights(String),
  #[error("record was modified concurrently")]
  ConcurrentModification,
  #[error("embedding provider unavailable: {0}")]
  ProviderUnavailable(String),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}
