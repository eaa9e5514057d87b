use std::collections::BTreeSet;

use bon::bon;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{error::DoublonError, matching::extractors};

/// Tolerance applied when checking that weights sum to 1.0, matching the
/// upstream dashboard's acceptance window.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// One catalog item.
///
/// A product is *eligible* for matching as long as it has not been linked
/// into another record. Linking sets `superseded_by` and `deleted_at`
/// together, exactly once, and moves the barcodes onto the master.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Product {
  pub id: i64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub brand: String,
  #[serde(default)]
  pub category: String,
  #[serde(default, with = "barcode_list")]
  pub barcodes: BTreeSet<String>,
  #[serde(default)]
  pub nutrition: Nutrition,
  #[serde(default)]
  pub active: bool,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub superseded_by: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub deleted_at: Option<Timestamp>,

  #[serde(default)]
  pub version: u64,
}

impl Product {
  /// A product can be matched and ranked only while it has neither been
  /// soft-deleted nor merged into a master record.
  pub fn is_eligible(&self) -> bool {
    self.deleted_at.is_none() && self.superseded_by.is_none()
  }

  /// The normalized free-text content submitted to the embedding provider.
  pub fn search_text(&self) -> String {
    let name = extractors::normalize(&self.name);
    let brand = extractors::normalize(&self.brand);

    format!("{name} {brand}").trim().to_string()
  }
}

#[bon]
impl Product {
  #[builder]
  pub fn builder(
    #[builder(start_fn)] id: i64,
    name: Option<&str>,
    brand: Option<&str>,
    category: Option<&str>,
    barcodes: Option<&[&str]>,
    nutrition: Option<Nutrition>,
    active: Option<bool>,
  ) -> Product {
    Product {
      id,
      name: name.unwrap_or_default().to_string(),
      brand: brand.unwrap_or_default().to_string(),
      category: category.unwrap_or_default().to_string(),
      barcodes: barcodes.unwrap_or_default().iter().map(ToString::to_string).collect(),
      nutrition: nutrition.unwrap_or_default(),
      active: active.unwrap_or_default(),
      ..Default::default()
    }
  }
}

/// Per-100g nutrition facts, every field independently optional. Field names
/// follow the upstream CSV export.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Nutrition {
  pub energy: Option<f64>,
  pub carbohydrates: Option<f64>,
  pub fat: Option<f64>,
  pub protein: Option<f64>,
  pub saturated_fatty_acid: Option<f64>,
  pub sugar: Option<f64>,
  pub salt: Option<f64>,
}

impl Nutrition {
  pub(crate) fn fields(&self) -> [(&'static str, Option<f64>); 7] {
    [
      ("energy", self.energy),
      ("carbohydrates", self.carbohydrates),
      ("fat", self.fat),
      ("protein", self.protein),
      ("saturated_fatty_acid", self.saturated_fatty_acid),
      ("sugar", self.sugar),
      ("salt", self.salt),
    ]
  }
}

/// Editable fields of a product. Absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductPatch {
  pub name: Option<String>,
  pub brand: Option<String>,
  pub category: Option<String>,
  pub nutrition: Option<Nutrition>,
}

impl ProductPatch {
  /// Whether applying this patch changes the text submitted for embedding.
  pub(crate) fn touches_search_text(&self) -> bool {
    self.name.is_some() || self.brand.is_some()
  }
}

/// Non-negative weights over the four similarity signals. Immutable for the
/// duration of a scoring run; must sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Weights {
  pub text: f64,
  pub nutrition: f64,
  pub brand: f64,
  pub barcode: f64,
}

impl Default for Weights {
  fn default() -> Self {
    Weights {
      text: 0.8,
      nutrition: 0.0,
      brand: 0.1,
      barcode: 0.1,
    }
  }
}

impl Weights {
  pub fn validate(&self) -> Result<(), DoublonError> {
    let weights = [self.text, self.nutrition, self.brand, self.barcode];

    if weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
      return Err(DoublonError::InvalidWeights("weights must be non-negative finite numbers".to_string()));
    }

    let total: f64 = weights.iter().sum();

    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
      return Err(DoublonError::InvalidWeights(format!("weights must sum to 1.0, got {total:.2}")));
    }

    Ok(())
  }
}

/// The source system stores multi-barcode cells as a `;`-delimited string.
/// We keep that wire format so snapshots round-trip unchanged.
mod barcode_list {
  use std::collections::BTreeSet;

  use itertools::Itertools;
  use serde::{Deserialize, Deserializer, Serializer};

  pub(super) fn serialize<S: Serializer>(barcodes: &BTreeSet<String>, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(&barcodes.iter().join(";"))
  }

  pub(super) fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<BTreeSet<String>, D::Error> {
    let raw = String::deserialize(de)?;

    Ok(raw.split(';').map(str::trim).filter(|code| !code.is_empty()).map(ToString::to_string).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::{Product, Weights};
  use crate::error::DoublonError;

  #[test]
  fn eligibility() {
    let product = Product::builder(1).name("acme cola").barcodes(&["111"]).build();

    assert!(product.is_eligible());

    let mut superseded = product.clone();
    superseded.superseded_by = Some(2);
    superseded.deleted_at = Some(jiff::Timestamp::now());

    assert!(!superseded.is_eligible());
  }

  #[test]
  fn search_text_is_normalized() {
    let product = Product::builder(1).name("Açaí  Cola Zéro").brand("ACME Inc.").build();

    assert_eq!(product.search_text(), "acai cola zero acme inc");
  }

  #[test]
  fn barcodes_round_trip_as_delimited_string() {
    let product = Product::builder(1).name("acme cola").barcodes(&["222", "111"]).build();
    let json = serde_json::to_value(&product).unwrap();

    assert_eq!(json["barcodes"], "111;222");

    let back: Product = serde_json::from_value(json).unwrap();

    assert_eq!(back.barcodes, product.barcodes);
  }

  #[test]
  fn empty_barcode_segments_are_dropped() {
    let product: Product = serde_json::from_value(serde_json::json!({ "id": 1, "barcodes": "111;; 222 ;" })).unwrap();

    assert_eq!(product.barcodes.len(), 2);
    assert!(product.barcodes.contains("111"));
    assert!(product.barcodes.contains("222"));
  }

  #[test]
  fn weights_validation() {
    assert!(Weights::default().validate().is_ok());

    let uneven = Weights { text: 0.5, nutrition: 0.2, brand: 0.1, barcode: 0.1 };

    assert!(matches!(uneven.validate(), Err(DoublonError::InvalidWeights(_))));

    let negative = Weights { text: 1.2, nutrition: -0.2, brand: 0.0, barcode: 0.0 };

    assert!(matches!(negative.validate(), Err(DoublonError::InvalidWeights(_))));

    let within_tolerance = Weights { text: 0.705, nutrition: 0.2, brand: 0.05, barcode: 0.05 };

    assert!(within_tolerance.validate().is_ok());
  }
}
