use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{embed::EmbeddingProvider, error::DoublonError};

/// Client for an external embedding service exposing `POST /embed`.
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
  client: reqwest::Client,
  base_url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'r> {
  texts: &'r [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
  vectors: Vec<Vec<f32>>,
}

impl HttpEmbeddingProvider {
  pub fn new(base_url: &str, timeout: Duration) -> Result<HttpEmbeddingProvider, DoublonError> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|err| DoublonError::ProviderUnavailable(err.to_string()))?;

    Ok(HttpEmbeddingProvider {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }
}

impl EmbeddingProvider for HttpEmbeddingProvider {
  async fn health(&self) -> Result<bool, DoublonError> {
    match self.client.get(format!("{}/", self.base_url)).send().await {
      Ok(response) => Ok(response.status().is_success()),
      Err(_) => Ok(false),
    }
  }

  async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DoublonError> {
    let response = self
      .client
      .post(format!("{}/embed", self.base_url))
      .json(&EmbedRequest { texts })
      .send()
      .await
      .map_err(|err| DoublonError::ProviderUnavailable(err.to_string()))?;

    if !response.status().is_success() {
      return Err(DoublonError::ProviderUnavailable(format!("embedding service returned {}", response.status())));
    }

    let body: EmbedResponse = response.json().await.map_err(|err| DoublonError::ProviderUnavailable(err.to_string()))?;

    if body.vectors.len() != texts.len() {
      return Err(DoublonError::ProviderUnavailable(format!("expected {} vectors, got {}", texts.len(), body.vectors.len())));
    }

    Ok(body.vectors)
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  use crate::{embed::EmbeddingProvider, error::DoublonError};

  fn provider(server: &MockServer) -> super::HttpEmbeddingProvider {
    super::HttpEmbeddingProvider::new(&server.uri(), Duration::from_secs(2)).unwrap()
  }

  #[tokio::test]
  async fn embeds_a_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/embed"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "vectors": [[0.1, 0.2], [0.3, 0.4]] })))
      .mount(&server)
      .await;

    let vectors = provider(&server).embed(&["acme cola".to_string(), "acme cola zero".to_string()]).await.unwrap();

    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[0], vec![0.1, 0.2]);
  }

  #[tokio::test]
  async fn upstream_errors_surface_as_provider_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST")).and(path("/embed")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

    let result = provider(&server).embed(&["acme cola".to_string()]).await;

    assert!(matches!(result, Err(DoublonError::ProviderUnavailable(_))));
  }

  #[tokio::test]
  async fn vector_count_mismatch_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/embed"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "vectors": [[0.1, 0.2]] })))
      .mount(&server)
      .await;

    let result = provider(&server).embed(&["a".to_string(), "b".to_string()]).await;

    assert!(matches!(result, Err(DoublonError::ProviderUnavailable(_))));
  }

  #[tokio::test]
  async fn health_reflects_reachability() {
    let server = MockServer::start().await;

    Mock::given(method("GET")).and(path("/")).respond_with(ResponseTemplate::new(200)).mount(&server).await;

    assert!(provider(&server).health().await.unwrap());

    let unreachable = super::HttpEmbeddingProvider::new("http://127.0.0.1:1", Duration::from_millis(200)).unwrap();

    assert!(!unreachable.health().await.unwrap());
  }
}
