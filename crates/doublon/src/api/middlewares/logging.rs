use std::net::SocketAddr;

use axum::{
  RequestPartsExt,
  body::{Body, HttpBody},
  extract::{ConnectInfo, State},
  http::{Request, StatusCode},
  middleware::Next,
  response::Response,
};
use jiff::Timestamp;
use libdoublon::prelude::*;
use metrics::histogram;
use tokio::time::Instant;

use crate::api::{AppState, middlewares::RequestId};

pub async fn api_logger<S, E>(State(_): State<AppState<S, E>>, request: Request<Body>, next: Next) -> Result<Response, StatusCode>
where
  S: CatalogStore,
  E: EmbeddingProvider,
{
  let time = Timestamp::now().strftime("%Y-%m-%dT%H:%M:%S%z").to_string();
  let method = request.method().clone();
  let uri = request.uri().clone();

  let (mut parts, body) = request.into_parts();
  let ip = if let Ok(ConnectInfo(addr)) = parts.extract::<ConnectInfo<SocketAddr>>().await {
    addr.ip().to_string()
  } else {
    "-".to_string()
  };

  let request_id = parts.extensions.get::<RequestId>().map(|id| id.0.to_string()).unwrap_or_else(|| "-".to_string());

  let then = Instant::now();
  let response = next.run(Request::from_parts(parts, body)).await;

  histogram!("doublon_request_latency_seconds").record(then.elapsed().as_secs_f64());

  tracing::info!(
    time = time,
    remote = ip,
    request_id = request_id,
    method = %method,
    path = uri.path(),
    status = response.status().as_u16(),
    latency = then.elapsed().as_millis(),
    size = response.size_hint().exact().unwrap_or(0),
    "{} {}",
    method,
    uri,
  );

  Ok(response)
}
