use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use libdoublon::prelude::*;
use tracing::instrument;

use crate::api::{AppState, dto::LinkPayload, errors::AppError, middlewares::json_rejection::TypedJson};

#[instrument(skip_all)]
pub async fn link<S: CatalogStore, E: EmbeddingProvider>(State(state): State<AppState<S, E>>, TypedJson(body): TypedJson<LinkPayload>) -> Result<(StatusCode, impl IntoResponse), AppError> {
  let outcome = state.doublon.link(body.master_id, &body.duplicate_ids).await.map_err(Into::<AppError>::into)?;

  Ok((StatusCode::OK, Json(outcome)))
}
