use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use libdoublon::prelude::*;
use tokio::time::Instant;
use tracing::instrument;

use crate::api::{
  AppState,
  dto::{SimilarHit, SimilarParameters, SimilarPayload, SimilarResponse},
  errors::AppError,
  middlewares::json_rejection::TypedJson,
};

#[instrument(skip_all)]
pub async fn similar<S: CatalogStore, E: EmbeddingProvider>(State(state): State<AppState<S, E>>, TypedJson(body): TypedJson<SimilarPayload>) -> Result<(StatusCode, impl IntoResponse), AppError> {
  let top_n = body.top_n.unwrap_or(state.config.top_n_results);
  let weights = body.weights.unwrap_or_default();

  let then = Instant::now();
  let (query_product, hits) = state.doublon.rank(body.product_id, &weights, top_n).await.map_err(Into::<AppError>::into)?;

  let response = SimilarResponse {
    query_product,
    similar_products: hits.into_iter().enumerate().map(|(index, hit)| SimilarHit { rank: index + 1, hit }).collect(),
    parameters: SimilarParameters { top_n, weights },
    computation_time_ms: then.elapsed().as_millis(),
  };

  Ok((StatusCode::OK, Json(response)))
}
