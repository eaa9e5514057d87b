use axum::{
  Json,
  extract::{Path, State},
  response::IntoResponse,
};
use axum_extra::extract::{Query, QueryRejection, WithRejection};
use libdoublon::prelude::*;
use tracing::instrument;

use crate::api::{AppState, dto::{ListParams, UpdatePayload}, errors::AppError, middlewares::json_rejection::TypedJson};

#[instrument(skip_all)]
pub async fn get_product<S: CatalogStore, E: EmbeddingProvider>(State(state): State<AppState<S, E>>, Path(id): Path<i64>) -> Result<impl IntoResponse, AppError> {
  let product = state.doublon.product(id).await.map_err(Into::<AppError>::into)?;

  Ok(Json(product))
}

#[instrument(skip_all)]
pub async fn list_products<S: CatalogStore, E: EmbeddingProvider>(
  State(state): State<AppState<S, E>>,
  WithRejection(Query(params), _): WithRejection<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
  let products = state.doublon.eligible(params.filter).await.map_err(Into::<AppError>::into)?;

  Ok(Json(products))
}

#[instrument(skip_all)]
pub async fn update_product<S: CatalogStore, E: EmbeddingProvider>(
  State(state): State<AppState<S, E>>,
  Path(id): Path<i64>,
  TypedJson(body): TypedJson<UpdatePayload>,
) -> Result<impl IntoResponse, AppError> {
  let product = state.doublon.update_product(id, body.patch, body.set_active, body.expected_version).await.map_err(Into::<AppError>::into)?;

  Ok(Json(product))
}
