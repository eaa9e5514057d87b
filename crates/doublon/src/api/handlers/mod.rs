mod link;
mod products;
mod similar;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use libdoublon::prelude::*;
use tracing::instrument;

use crate::api::{AppState, dto::IndexResponse, errors::AppError};

pub use self::link::link;
pub use self::products::{get_product, list_products, update_product};
pub use self::similar::similar;

pub async fn not_found() -> impl IntoResponse {
  AppError::ResourceNotFound
}

pub async fn healthz() -> StatusCode {
  StatusCode::OK
}

pub async fn readyz<S: CatalogStore, E: EmbeddingProvider>(State(state): State<AppState<S, E>>) -> Result<StatusCode, AppError> {
  match state.doublon.ready().await {
    Ok(true) => Ok(StatusCode::OK),
    _ => Ok(StatusCode::SERVICE_UNAVAILABLE),
  }
}

pub async fn prometheus<S: CatalogStore, E: EmbeddingProvider>(State(state): State<AppState<S, E>>) -> impl IntoResponse {
  match state.prometheus {
    Some(handle) => handle.render().into_response(),
    None => StatusCode::NOT_FOUND.into_response(),
  }
}

#[instrument(skip_all)]
pub async fn index<S: CatalogStore, E: EmbeddingProvider>(State(state): State<AppState<S, E>>) -> Result<impl IntoResponse, AppError> {
  let stats = state.doublon.stats().await.map_err(Into::<AppError>::into)?;

  Ok(Json(IndexResponse {
    service: "doublon",
    version: env!("CARGO_PKG_VERSION"),
    status: "ok",
    total_products: stats.total_products,
    active_products: stats.active_products,
  }))
}

#[instrument(skip_all)]
pub async fn stats<S: CatalogStore, E: EmbeddingProvider>(State(state): State<AppState<S, E>>) -> Result<impl IntoResponse, AppError> {
  let stats = state.doublon.stats().await.map_err(Into::<AppError>::into)?;

  Ok(Json(stats))
}
