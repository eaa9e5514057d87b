use std::error::Error;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use libdoublon::prelude::*;
use serde_json::json;
use tracing::*;

pub(super) struct ApiError(pub StatusCode, pub String, pub Option<Vec<String>>);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("{0}")]
  BadRequest(String),
  #[error("missing resource")]
  ResourceNotFound,
  #[error("{0}")]
  Conflict(String),
  #[error("embedding backend unavailable: {0}")]
  BackendUnavailable(String),
  #[error("server error, please check your logs for more information")]
  ServerError,
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),

  #[error("invalid configuration: {0}")]
  ConfigError(String),

  #[error("invalid query parameter")]
  InvalidQuery(#[from] axum_extra::extract::QueryRejection),
}

impl From<DoublonError> for AppError {
  fn from(value: DoublonError) -> Self {
    match value {
      DoublonError::NotFound => AppError::ResourceNotFound,
      DoublonError::InvalidQuery(err) => AppError::BadRequest(err),
      DoublonError::InvalidMerge(err) => AppError::BadRequest(err),
      DoublonError::InvalidWeights(err) => AppError::BadRequest(err),
      DoublonError::AlreadyLinked => AppError::Conflict(value.to_string()),
      DoublonError::ConcurrentModification => AppError::Conflict(value.to_string()),
      DoublonError::ProviderUnavailable(err) => AppError::BackendUnavailable(err),
      DoublonError::OtherError(err) => AppError::OtherError(err),
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    error!(error = self.source(), "{}", self.to_string());

    ApiError::from(&self).into_response()
  }
}

impl From<&AppError> for ApiError {
  fn from(value: &AppError) -> Self {
    match value {
      AppError::BadRequest(_) => ApiError(StatusCode::BAD_REQUEST, value.to_string(), None),
      AppError::ResourceNotFound => ApiError(StatusCode::NOT_FOUND, value.to_string(), None),
      AppError::Conflict(_) => ApiError(StatusCode::CONFLICT, value.to_string(), None),
      AppError::BackendUnavailable(_) => ApiError(StatusCode::SERVICE_UNAVAILABLE, value.to_string(), None),
      AppError::InvalidQuery(err) => ApiError(StatusCode::BAD_REQUEST, value.to_string(), Some(vec![err.to_string()])),
      AppError::OtherError(inner) if inner.is::<AppError>() => match inner.downcast_ref::<AppError>() {
        Some(inner) => inner.into(),
        _ => ApiError(StatusCode::INTERNAL_SERVER_ERROR, value.to_string(), None),
      },
      _ => ApiError(StatusCode::INTERNAL_SERVER_ERROR, value.to_string(), None),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let payload = match self.2 {
      Some(details) => json!({
          "message": self.1.to_string(),
          "details": details,
      }),
      None => json!({
          "message": self.1.to_string(),
      }),
    };

    (self.0, Json(payload)).into_response()
  }
}
