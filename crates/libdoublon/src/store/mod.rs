pub mod memory;
pub mod snapshot;

use serde::Deserialize;

use crate::{
  error::DoublonError,
  linking::MergeOutcome,
  model::{Product, ProductPatch},
};

/// Which side of the `active` partition to read.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ActiveFilter {
  #[default]
  All,
  Active,
  Inactive,
}

/// The persistence boundary of the deduplication engine.
///
/// Implementations must keep two promises: `list_eligible` returns an
/// internally consistent snapshot (a concurrent merge is either fully
/// visible or not at all), and `apply_merge` commits atomically, leaving
/// every record untouched when any part of the validation fails.
#[allow(async_fn_in_trait)]
pub trait CatalogStore: Clone + Send + Sync + 'static {
  fn health(&self) -> impl Future<Output = Result<bool, DoublonError>> + Send;
  fn get(&self, id: i64) -> impl Future<Output = Result<Product, DoublonError>> + Send;
  fn list_all(&self) -> impl Future<Output = Result<Vec<Product>, DoublonError>> + Send;
  fn list_eligible(&self, filter: ActiveFilter) -> impl Future<Output = Result<Vec<Product>, DoublonError>> + Send;
  fn apply_merge(&self, master_id: i64, duplicate_ids: &[i64]) -> impl Future<Output = Result<MergeOutcome, DoublonError>> + Send;
  fn update(&self, id: i64, patch: ProductPatch, set_active: bool, expected_version: Option<u64>) -> impl Future<Output = Result<Product, DoublonError>> + Send;
}
