use std::borrow::Cow;

use axum::{
  Json, RequestExt,
  body::Body,
  extract::{FromRequest, rejection::JsonRejection},
  http::{Request, StatusCode},
  response::IntoResponse,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::api::errors::ApiError;

/// JSON extractor that runs the payload through its `validator` rules before
/// the handler ever sees it.
pub struct TypedJson<T>(pub T);

pub enum TypedJsonRejection {
  Malformed(JsonRejection),
  Invalid(ValidationErrors),
}

impl IntoResponse for TypedJsonRejection {
  fn into_response(self) -> axum::response::Response {
    match self {
      TypedJsonRejection::Malformed(JsonRejection::MissingJsonContentType(_)) => ApiError(StatusCode::UNSUPPORTED_MEDIA_TYPE, "expected an application/json body".to_string(), None).into_response(),
      TypedJsonRejection::Malformed(JsonRejection::JsonSyntaxError(_)) => ApiError(StatusCode::BAD_REQUEST, "body is not valid JSON".to_string(), None).into_response(),
      TypedJsonRejection::Malformed(err) => ApiError(StatusCode::BAD_REQUEST, "body does not match the expected shape".to_string(), Some(vec![err.to_string()])).into_response(),

      TypedJsonRejection::Invalid(errs) => {
        let reasons = errs.field_errors().into_iter().flat_map(|(_, field)| field.clone()).filter_map(|err| err.message.map(Cow::into_owned)).collect::<Vec<_>>();

        ApiError(StatusCode::UNPROCESSABLE_ENTITY, "payload failed validation".to_string(), Some(reasons)).into_response()
      }
    }
  }
}

impl<T, S> FromRequest<S> for TypedJson<T>
where
  T: DeserializeOwned + Validate + 'static,
  S: Send + Sync,
{
  type Rejection = TypedJsonRejection;

  async fn from_request(request: Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
    let Json(dto) = request.extract::<Json<T>, _>().await.map_err(TypedJsonRejection::Malformed)?;

    dto.validate().map_err(TypedJsonRejection::Invalid)?;

    Ok(TypedJson(dto))
  }
}
