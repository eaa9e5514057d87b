use crate::matching::{Feature, MatchInput};

/// 1 when the two barcode sets intersect, 0 otherwise. Since eligible
/// records never share a barcode after a committed merge, a hit here is a
/// very strong duplicate signal.
pub(crate) struct BarcodeOverlap;

impl Feature for BarcodeOverlap {
  fn name(&self) -> &'static str {
    "barcode_overlap"
  }

  fn score_feature(&self, lhs: &MatchInput, rhs: &MatchInput) -> f64 {
    if lhs.product.barcodes.is_disjoint(&rhs.product.barcodes) {
      return 0.0;
    }

    1.0
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    matching::{Feature, MatchInput},
    model::Product,
  };

  #[test]
  fn overlapping_sets_match() {
    let a = Product::builder(1).barcodes(&["111", "222"]).build();
    let b = Product::builder(2).barcodes(&["222", "333"]).build();

    assert_eq!(super::BarcodeOverlap.score_feature(&MatchInput::new(&a, None), &MatchInput::new(&b, None)), 1.0);
  }

  #[test]
  fn disjoint_or_empty_sets_do_not_match() {
    let a = Product::builder(1).barcodes(&["111"]).build();
    let b = Product::builder(2).barcodes(&["222"]).build();
    let empty = Product::builder(3).build();

    assert_eq!(super::BarcodeOverlap.score_feature(&MatchInput::new(&a, None), &MatchInput::new(&b, None)), 0.0);
    assert_eq!(super::BarcodeOverlap.score_feature(&MatchInput::new(&empty, None), &MatchInput::new(&empty, None)), 0.0);
  }
}
