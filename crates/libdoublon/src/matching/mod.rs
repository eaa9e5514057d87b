mod matchers;

pub(crate) mod extractors;

use crate::model::Product;

pub(crate) use matchers::{barcode::BarcodeOverlap, brand::BrandExactMatch, nutrition::NutritionProfile, text::TextEmbeddingCosine};

/// One side of a comparison: the record plus its precomputed embedding
/// vector, when one is available.
pub struct MatchInput<'p> {
  pub product: &'p Product,
  pub vector: Option<&'p [f32]>,

  // Normalized once per input so features do not re-clean the brand for
  // every pair.
  pub(crate) brand_norm: String,
}

impl<'p> MatchInput<'p> {
  pub fn new(product: &'p Product, vector: Option<&'p [f32]>) -> MatchInput<'p> {
    MatchInput {
      product,
      vector,
      brand_norm: extractors::normalize(&product.brand),
    }
  }
}

pub(crate) trait Feature: Send + Sync {
  fn name(&self) -> &'static str;
  fn score_feature(&self, lhs: &MatchInput, rhs: &MatchInput) -> f64;
}

pub(crate) fn run_features(lhs: &MatchInput, rhs: &MatchInput, features: &[(&dyn Feature, f64)]) -> (f64, Vec<(&'static str, f64)>) {
  let mut results = Vec::with_capacity(features.len());

  let score = features.iter().fold(0.0f64, |score, (func, weight)| {
    let feature_score = func.score_feature(lhs, rhs);

    results.push((func.name(), feature_score));

    tracing::trace!(feature = func.name(), score = feature_score, "computed feature score");

    score + (feature_score * weight)
  });

  (score.clamp(0.0, 1.0), results)
}
