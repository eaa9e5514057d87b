use crate::{embed::EmbeddingProvider, error::DoublonError};

/// Deterministic embedder for tests and offline runs.
///
/// Each text maps to a 36-dimension character-frequency vector over
/// `[a-z0-9]`. Identical texts embed identically (cosine 1.0) and texts
/// sharing most of their characters land close together, which is enough
/// structure to exercise the ranking pipeline without a model.
#[derive(Clone, Copy, Debug, Default)]
pub struct StubEmbedder;

const DIMENSIONS: usize = 36;

impl StubEmbedder {
  fn vectorize(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; DIMENSIONS];

    for c in text.to_lowercase().chars() {
      let index = match c {
        'a'..='z' => (c as usize) - ('a' as usize),
        '0'..='9' => 26 + (c as usize) - ('0' as usize),
        _ => continue,
      };

      vector[index] += 1.0;
    }

    vector
  }
}

impl EmbeddingProvider for StubEmbedder {
  async fn health(&self) -> Result<bool, DoublonError> {
    Ok(true)
  }

  async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DoublonError> {
    Ok(texts.iter().map(|text| StubEmbedder::vectorize(text)).collect())
  }
}

#[cfg(test)]
mod tests {
  use crate::embed::EmbeddingProvider;

  #[tokio::test]
  async fn embedding_is_deterministic() {
    let embedder = super::StubEmbedder;

    let first = embedder.embed(&["acme cola".to_string()]).await.unwrap();
    let second = embedder.embed(&["acme cola".to_string()]).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].len(), super::DIMENSIONS);
  }

  #[tokio::test]
  async fn distinct_texts_embed_differently() {
    let embedder = super::StubEmbedder;
    let vectors = embedder.embed(&["acme cola".to_string(), "umbrella soup".to_string()]).await.unwrap();

    assert_ne!(vectors[0], vectors[1]);
  }
}
