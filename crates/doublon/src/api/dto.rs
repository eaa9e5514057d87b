use libdoublon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct SimilarPayload {
  pub product_id: i64,

  #[validate(range(min = 1, message = "top_n must be a positive number"))]
  pub top_n: Option<usize>,

  // Absent weights fall back to the engine defaults.
  #[serde(default)]
  pub weights: Option<Weights>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct LinkPayload {
  pub master_id: i64,

  #[validate(length(min = 1, message = "at least one duplicate must be provided"))]
  pub duplicate_ids: Vec<i64>,
}

#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct UpdatePayload {
  #[serde(flatten)]
  pub patch: ProductPatch,

  #[serde_inline_default(false)]
  pub set_active: bool,
  pub expected_version: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ListParams {
  #[serde(default)]
  pub filter: ActiveFilter,
}

#[derive(Serialize)]
pub(super) struct SimilarResponse {
  pub query_product: Product,
  pub similar_products: Vec<SimilarHit>,
  pub parameters: SimilarParameters,
  pub computation_time_ms: u128,
}

#[derive(Serialize)]
pub(super) struct SimilarHit {
  pub rank: usize,

  #[serde(flatten)]
  pub hit: RankedHit,
}

#[derive(Serialize)]
pub(super) struct SimilarParameters {
  pub top_n: usize,
  pub weights: Weights,
}

#[derive(Serialize)]
pub(super) struct IndexResponse {
  pub service: &'static str,
  pub version: &'static str,
  pub status: &'static str,
  pub total_products: usize,
  pub active_products: usize,
}
