use metrics::histogram;
use serde::Serialize;

use crate::{
  matching::{BarcodeOverlap, BrandExactMatch, Feature, MatchInput, NutritionProfile, TextEmbeddingCosine, run_features},
  model::Weights,
};

/// Per-signal breakdown of a composite score, exposed so callers can show
/// operators why a candidate ranked where it did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Components {
  pub text: f64,
  pub nutrition: f64,
  pub brand: f64,
  pub barcode: f64,
}

impl Components {
  fn from_results(results: &[(&'static str, f64)]) -> Components {
    let mut components = Components::default();

    for (name, score) in results {
      match *name {
        "text_embedding_cosine" => components.text = *score,
        "nutrition_profile" => components.nutrition = *score,
        "brand_exact_match" => components.brand = *score,
        "barcode_overlap" => components.barcode = *score,
        _ => {}
      }
    }

    components
  }
}

/// Composite similarity between two records: the weighted sum of the four
/// signals, guaranteed to stay within `[0, 1]` for validated weights.
pub fn composite(lhs: &MatchInput, rhs: &MatchInput, weights: &Weights) -> (f64, Components) {
  let features: &[(&dyn Feature, f64)] = &[
    (&TextEmbeddingCosine, weights.text),
    (&NutritionProfile, weights.nutrition),
    (&BrandExactMatch, weights.brand),
    (&BarcodeOverlap, weights.barcode),
  ];

  let (score, results) = run_features(lhs, rhs, features);

  histogram!("doublon_scoring_scores").record(score);

  (score, Components::from_results(&results))
}
