use std::sync::Arc;

use ahash::HashMap;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::{
  error::DoublonError,
  linking::{self, MergeOutcome},
  model::{Product, ProductPatch},
  store::{ActiveFilter, CatalogStore},
};

/// Lock-guarded in-memory catalog.
///
/// Reads clone under a single read acquisition, so every caller gets a
/// copy-on-read snapshot that a concurrent merge can never tear. Merges and
/// updates serialize on the writer side of the lock, which is what makes
/// `apply_merge` all-or-nothing: validation happens against the locked map
/// and mutation only starts once the whole plan is accepted.
#[derive(Clone, Default)]
pub struct MemoryStore {
  records: Arc<RwLock<HashMap<i64, Product>>>,
}

impl MemoryStore {
  pub fn new() -> MemoryStore {
    MemoryStore::default()
  }

  pub fn with_products(products: Vec<Product>) -> MemoryStore {
    let records = products.into_iter().map(|product| (product.id, product)).collect::<HashMap<_, _>>();

    MemoryStore {
      records: Arc::new(RwLock::new(records)),
    }
  }
}

impl CatalogStore for MemoryStore {
  async fn health(&self) -> Result<bool, DoublonError> {
    Ok(true)
  }

  async fn get(&self, id: i64) -> Result<Product, DoublonError> {
    self.records.read().await.get(&id).cloned().ok_or(DoublonError::NotFound)
  }

  async fn list_all(&self) -> Result<Vec<Product>, DoublonError> {
    let records = self.records.read().await;
    let mut products = records.values().cloned().collect::<Vec<_>>();

    products.sort_by_key(|product| product.id);

    Ok(products)
  }

  async fn list_eligible(&self, filter: ActiveFilter) -> Result<Vec<Product>, DoublonError> {
    let records = self.records.read().await;

    let mut products = records
      .values()
      .filter(|product| product.is_eligible())
      .filter(|product| match filter {
        ActiveFilter::All => true,
        ActiveFilter::Active => product.active,
        ActiveFilter::Inactive => !product.active,
      })
      .cloned()
      .collect::<Vec<_>>();

    products.sort_by_key(|product| product.id);

    Ok(products)
  }

  async fn apply_merge(&self, master_id: i64, duplicate_ids: &[i64]) -> Result<MergeOutcome, DoublonError> {
    let mut records = self.records.write().await;

    let plan = linking::plan_merge(&records, master_id, duplicate_ids)?;
    let outcome = linking::apply_plan(&mut records, plan, Timestamp::now());

    tracing::info!(master = master_id, superseded = ?outcome.superseded, "committed merge");

    Ok(outcome)
  }

  async fn update(&self, id: i64, patch: ProductPatch, set_active: bool, expected_version: Option<u64>) -> Result<Product, DoublonError> {
    let mut records = self.records.write().await;

    let Some(product) = records.get_mut(&id) else {
      return Err(DoublonError::NotFound);
    };

    // Superseded records are frozen, their content can never change again.
    if !product.is_eligible() {
      return Err(DoublonError::AlreadyLinked);
    }

    if let Some(expected) = expected_version
      && expected != product.version
    {
      return Err(DoublonError::ConcurrentModification);
    }

    if let Some(name) = patch.name {
      product.name = name;
    }
    if let Some(brand) = patch.brand {
      product.brand = brand;
    }
    if let Some(category) = patch.category {
      product.category = category;
    }
    if let Some(nutrition) = patch.nutrition {
      product.nutrition = nutrition;
    }
    if set_active {
      product.active = true;
    }

    product.version += 1;

    Ok(product.clone())
  }
}
