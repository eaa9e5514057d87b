pub mod http;
pub mod stub;

use std::sync::Arc;

use ahash::HashMap;
use tokio::sync::RwLock;

use crate::{error::DoublonError, model::Product};

/// The opaque text-to-vector capability. The engine only ever consumes
/// vectors, it never trains or introspects the model behind them.
#[allow(async_fn_in_trait)]
pub trait EmbeddingProvider: Clone + Send + Sync + 'static {
  fn health(&self) -> impl Future<Output = Result<bool, DoublonError>> + Send;
  fn embed(&self, texts: &[String]) -> impl Future<Output = Result<Vec<Vec<f32>>, DoublonError>> + Send;
}

/// Cache of one embedding vector per product id.
///
/// The service warms it once at startup, mirroring the upstream API which
/// precomputed every product embedding before accepting requests. Entries
/// are dropped when a record's text changes or is linked away, and the
/// ranker re-embeds whatever is missing in a single batch call.
#[derive(Clone, Default)]
pub struct EmbeddingIndex {
  vectors: Arc<RwLock<HashMap<i64, Arc<Vec<f32>>>>>,
}

impl EmbeddingIndex {
  pub fn new() -> EmbeddingIndex {
    EmbeddingIndex::default()
  }

  /// Embed every product whose vector is not cached yet, in one provider
  /// call. Provider failures propagate, they are never papered over with
  /// zero vectors.
  pub async fn ensure<E: EmbeddingProvider>(&self, provider: &E, products: &[Product]) -> Result<usize, DoublonError> {
    let missing = {
      let vectors = self.vectors.read().await;

      products.iter().filter(|product| !vectors.contains_key(&product.id)).map(|product| (product.id, product.search_text())).collect::<Vec<_>>()
    };

    if missing.is_empty() {
      return Ok(0);
    }

    let texts = missing.iter().map(|(_, text)| text.clone()).collect::<Vec<_>>();
    let embedded = provider.embed(&texts).await?;

    if embedded.len() != missing.len() {
      return Err(DoublonError::ProviderUnavailable(format!("expected {} vectors, got {}", missing.len(), embedded.len())));
    }

    let count = embedded.len();
    let mut vectors = self.vectors.write().await;

    for ((id, _), vector) in missing.into_iter().zip(embedded) {
      vectors.insert(id, Arc::new(vector));
    }

    Ok(count)
  }

  pub async fn invalidate(&self, id: i64) {
    self.vectors.write().await.remove(&id);
  }

  /// Cheap clone of the id-to-vector map for use on the synchronous,
  /// lock-free scoring path.
  pub async fn snapshot(&self) -> HashMap<i64, Arc<Vec<f32>>> {
    self.vectors.read().await.clone()
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    embed::{EmbeddingIndex, stub::StubEmbedder},
    model::Product,
  };

  #[tokio::test]
  async fn ensure_only_embeds_missing_entries() {
    let index = EmbeddingIndex::new();
    let embedder = StubEmbedder::default();
    let products = vec![Product::builder(1).name("acme cola").build(), Product::builder(2).name("acme cola zero").build()];

    assert_eq!(index.ensure(&embedder, &products).await.unwrap(), 2);
    assert_eq!(index.ensure(&embedder, &products).await.unwrap(), 0);

    index.invalidate(2).await;

    assert_eq!(index.ensure(&embedder, &products).await.unwrap(), 1);
    assert_eq!(index.snapshot().await.len(), 2);
  }
}
