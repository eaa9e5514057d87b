use std::slice;

use tracing::instrument;

use crate::{
  catalog::{self, CatalogStats},
  embed::{EmbeddingIndex, EmbeddingProvider},
  error::DoublonError,
  linking::MergeOutcome,
  matching::MatchInput,
  model::{Product, ProductPatch, Weights},
  ranking::{self, RankedHit},
  store::{ActiveFilter, CatalogStore},
};

/// The deduplication engine, tying a catalog store, an embedding provider
/// and the vector cache together.
///
/// All mutations flow through here so the vector cache can never serve a
/// vector for text that no longer exists: merges and text-changing updates
/// invalidate their entries before the result is returned.
#[derive(Clone)]
pub struct Doublon<S, E> {
  store: S,
  embedder: E,
  embeddings: EmbeddingIndex,
}

impl<S, E> Doublon<S, E>
where
  S: CatalogStore,
  E: EmbeddingProvider,
{
  pub fn new(store: S, embedder: E) -> Doublon<S, E> {
    Doublon {
      store,
      embedder,
      embeddings: EmbeddingIndex::new(),
    }
  }

  /// Embed every eligible record in one batch. Called once at startup so
  /// the first ranking request does not pay for the whole catalog.
  pub async fn warm_embeddings(&self) -> Result<usize, DoublonError> {
    let products = self.store.list_eligible(ActiveFilter::All).await?;

    self.embeddings.ensure(&self.embedder, &products).await
  }

  pub async fn ready(&self) -> Result<bool, DoublonError> {
    Ok(self.store.health().await? && self.embedder.health().await?)
  }

  pub async fn product(&self, id: i64) -> Result<Product, DoublonError> {
    self.store.get(id).await
  }

  pub async fn eligible(&self, filter: ActiveFilter) -> Result<Vec<Product>, DoublonError> {
    self.store.list_eligible(filter).await
  }

  pub async fn stats(&self) -> Result<CatalogStats, DoublonError> {
    Ok(catalog::compute_stats(&self.store.list_all().await?))
  }

  /// Rank the whole eligible catalog against one query record.
  ///
  /// Candidates are snapshotted first and embedded in a single provider
  /// round trip before scoring starts, so no lock is held across a network
  /// call. A provider failure aborts the request, it never degrades into
  /// silently zeroed text scores.
  #[instrument(name = "rank", skip(self, weights))]
  pub async fn rank(&self, query_id: i64, weights: &Weights, top_n: usize) -> Result<(Product, Vec<RankedHit>), DoublonError> {
    weights.validate()?;

    if top_n == 0 {
      return Err(DoublonError::InvalidQuery("top_n must be positive".to_string()));
    }

    let query = match self.store.get(query_id).await {
      Ok(product) => product,
      Err(DoublonError::NotFound) => return Err(DoublonError::InvalidQuery(format!("unknown product {query_id}"))),
      Err(err) => return Err(err),
    };

    if !query.is_eligible() {
      return Err(DoublonError::InvalidQuery(format!("product {query_id} has been linked away")));
    }

    let candidates = self.store.list_eligible(ActiveFilter::All).await?.into_iter().filter(|product| product.id != query_id).collect::<Vec<_>>();

    self.embeddings.ensure(&self.embedder, slice::from_ref(&query)).await?;
    self.embeddings.ensure(&self.embedder, &candidates).await?;

    let vectors = self.embeddings.snapshot().await;
    let query_vector = vectors.get(&query.id).cloned();
    let lhs = MatchInput::new(&query, query_vector.as_deref().map(|vector| vector.as_slice()));

    let hits = ranking::rank_candidates(&lhs, &candidates, &vectors, weights, top_n);

    Ok((query, hits))
  }

  /// Merge duplicates into a master record. The store commits atomically;
  /// on success the superseded vectors are evicted since their text can
  /// never be queried again.
  #[instrument(name = "link", skip(self))]
  pub async fn link(&self, master_id: i64, duplicate_ids: &[i64]) -> Result<MergeOutcome, DoublonError> {
    let outcome = self.store.apply_merge(master_id, duplicate_ids).await?;

    for id in &outcome.superseded {
      self.embeddings.invalidate(*id).await;
    }

    Ok(outcome)
  }

  #[instrument(name = "update_product", skip(self, patch))]
  pub async fn update_product(&self, id: i64, patch: ProductPatch, set_active: bool, expected_version: Option<u64>) -> Result<Product, DoublonError> {
    let invalidate = patch.touches_search_text();
    let product = self.store.update(id, patch, set_active, expected_version).await?;

    if invalidate {
      self.embeddings.invalidate(id).await;
    }

    Ok(product)
  }
}
