use crate::matching::{Feature, MatchInput};

// Per-field scales reflecting each field's typical per-100g range, so a
// 10 kcal energy gap does not dwarf a 1 g salt gap.
const SCALES: [f64; 7] = [
  250.0, // energy
  25.0,  // carbohydrates
  20.0,  // fat
  10.0,  // protein
  10.0,  // saturated_fatty_acid
  15.0,  // sugar
  1.5,   // salt
];

/// Average scaled distance over the nutrition fields present in *both*
/// records, mapped to a similarity through `1 / (1 + avg)`. No shared field
/// means similarity 0, never an inflated default.
pub(crate) struct NutritionProfile;

impl Feature for NutritionProfile {
  fn name(&self) -> &'static str {
    "nutrition_profile"
  }

  fn score_feature(&self, lhs: &MatchInput, rhs: &MatchInput) -> f64 {
    let lhs_fields = lhs.product.nutrition.fields();
    let rhs_fields = rhs.product.nutrition.fields();

    let mut total = 0.0f64;
    let mut shared = 0usize;

    for (index, ((_, lhs_value), (_, rhs_value))) in lhs_fields.into_iter().zip(rhs_fields).enumerate() {
      if let (Some(lhs_value), Some(rhs_value)) = (lhs_value, rhs_value) {
        total += (lhs_value - rhs_value).abs() / SCALES[index];
        shared += 1;
      }
    }

    if shared == 0 {
      return 0.0;
    }

    1.0 / (1.0 + (total / shared as f64))
  }
}
