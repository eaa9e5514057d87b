mod catalog;
mod error;
mod linking;
mod matching;
mod ranking;
mod scoring;

pub mod doublon;
pub mod embed;
pub mod model;
pub mod store;

pub fn init() {
  let _ = *crate::matching::extractors::NON_ALPHANUMERIC;
  let _ = *crate::matching::extractors::WHITESPACE;
}

pub mod prelude {
  pub use crate::catalog::{CatalogStats, NutritionFieldStats};
  pub use crate::doublon::Doublon;
  pub use crate::error::DoublonError;
  pub use crate::linking::MergeOutcome;
  pub use crate::matching::MatchInput;
  pub use crate::model::{Nutrition, Product, ProductPatch, Weights};
  pub use crate::ranking::RankedHit;
  pub use crate::scoring::Components;
  pub use crate::store::{ActiveFilter, CatalogStore, memory::MemoryStore, snapshot::load_snapshot};

  pub use crate::embed::{EmbeddingIndex, EmbeddingProvider, http::HttpEmbeddingProvider, stub::StubEmbedder};
}
