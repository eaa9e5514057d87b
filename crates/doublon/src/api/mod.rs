use axum::{
  Router,
  middleware,
  routing::{get, post},
};
use libdoublon::prelude::*;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use crate::{api::config::Config, trace};

pub mod config;
pub mod dto;
pub mod errors;

pub mod handlers;
mod middlewares;

#[derive(Clone)]
pub struct AppState<S: CatalogStore, E: EmbeddingProvider> {
  pub config: Config,
  pub prometheus: Option<PrometheusHandle>,
  pub doublon: Doublon<S, E>,
}

pub async fn routes<S: CatalogStore, E: EmbeddingProvider>(config: &Config, store: S, embedder: E) -> anyhow::Result<Router> {
  let doublon = Doublon::new(store, embedder);

  match doublon.warm_embeddings().await {
    Ok(count) => tracing::info!(embeddings = count, "warmed embedding cache"),
    Err(err) => tracing::warn!(%err, "could not warm embedding cache, vectors will be computed on first use"),
  }

  let prometheus = match config.enable_prometheus {
    true => Some(trace::build_prometheus()?),
    false => None,
  };

  let state = AppState {
    config: config.clone(),
    prometheus,
    doublon,
  };

  Ok(
    Router::new()
      .route("/", get(handlers::index))
      .route("/similar", post(handlers::similar))
      .route("/products", get(handlers::list_products))
      .route("/products/{id}", get(handlers::get_product).post(handlers::update_product))
      .route("/link", post(handlers::link))
      .route("/stats", get(handlers::stats))
      .fallback(handlers::not_found)
      .layer(middleware::from_fn(middlewares::metrics))
      .layer(TraceLayer::new_for_http().make_span_with(middlewares::create_request_span))
      // The routes below will not go through the observability middlewares above
      .route("/healthz", get(handlers::healthz))
      .route("/readyz", get(handlers::readyz))
      .route("/metrics", get(handlers::prometheus))
      .layer(middleware::from_fn_with_state(state.clone(), middlewares::logging::api_logger))
      .layer(middleware::from_fn(middlewares::request_id))
      .with_state(state),
  )
}
