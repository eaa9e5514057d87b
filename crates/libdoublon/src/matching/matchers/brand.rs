use crate::matching::{Feature, MatchInput};

/// Exact match on the normalized brand, 1 or 0. Two records without a brand
/// do not match each other.
pub(crate) struct BrandExactMatch;

impl Feature for BrandExactMatch {
  fn name(&self) -> &'static str {
    "brand_exact_match"
  }

  fn score_feature(&self, lhs: &MatchInput, rhs: &MatchInput) -> f64 {
    if !lhs.brand_norm.is_empty() && lhs.brand_norm == rhs.brand_norm {
      return 1.0;
    }

    0.0
  }
}
