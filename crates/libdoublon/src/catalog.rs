use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Product;

/// Aggregate view over the whole catalog, including superseded records.
#[derive(Clone, Debug, Serialize)]
pub struct CatalogStats {
  pub total_products: usize,
  pub active_products: usize,
  pub inactive_products: usize,
  pub products_with_barcode: usize,
  pub products_with_brand: usize,
  pub nutrition_stats: BTreeMap<&'static str, NutritionFieldStats>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct NutritionFieldStats {
  pub mean: Option<f64>,
  pub median: Option<f64>,
  pub min: Option<f64>,
  pub max: Option<f64>,
}

impl NutritionFieldStats {
  fn over(mut values: Vec<f64>) -> NutritionFieldStats {
    if values.is_empty() {
      return NutritionFieldStats::default();
    }

    values.sort_by(f64::total_cmp);

    let median = match values.len() % 2 {
      0 => (values[values.len() / 2 - 1] + values[values.len() / 2]) / 2.0,
      _ => values[values.len() / 2],
    };

    NutritionFieldStats {
      mean: Some(values.iter().sum::<f64>() / values.len() as f64),
      median: Some(median),
      min: values.first().copied(),
      max: values.last().copied(),
    }
  }
}

pub fn compute_stats(products: &[Product]) -> CatalogStats {
  let mut per_field: BTreeMap<&'static str, Vec<f64>> = crate::model::Nutrition::default().fields().into_iter().map(|(field, _)| (field, vec![])).collect();

  for product in products {
    for (field, value) in product.nutrition.fields() {
      if let Some(value) = value {
        per_field.entry(field).or_default().push(value);
      }
    }
  }

  CatalogStats {
    total_products: products.len(),
    active_products: products.iter().filter(|product| product.active).count(),
    inactive_products: products.iter().filter(|product| !product.active).count(),
    products_with_barcode: products.iter().filter(|product| !product.barcodes.is_empty()).count(),
    products_with_brand: products.iter().filter(|product| !product.brand.is_empty()).count(),
    nutrition_stats: per_field.into_iter().map(|(field, values)| (field, NutritionFieldStats::over(values))).collect(),
  }
}

#[cfg(test)]
mod tests {
  use float_cmp::approx_eq;

  use crate::model::{Nutrition, Product};

  #[test]
  fn counts_partition_the_catalog() {
    let products = vec![
      Product::builder(1).name("acme cola").brand("Acme").barcodes(&["111"]).active(true).build(),
      Product::builder(2).name("acme cola zero").brand("Acme").barcodes(&["222"]).build(),
      Product::builder(3).name("store brand cola").build(),
    ];

    let stats = super::compute_stats(&products);

    assert_eq!(stats.total_products, 3);
    assert_eq!(stats.active_products, 1);
    assert_eq!(stats.inactive_products, 2);
    assert_eq!(stats.products_with_barcode, 2);
    assert_eq!(stats.products_with_brand, 2);
  }

  #[test]
  fn nutrition_stats_skip_missing_values() {
    let products = vec![
      Product::builder(1)
        .name("a")
        .nutrition(Nutrition {
          energy: Some(100.0),
          salt: Some(0.5),
          ..Default::default()
        })
        .build(),
      Product::builder(2)
        .name("b")
        .nutrition(Nutrition {
          energy: Some(300.0),
          ..Default::default()
        })
        .build(),
      Product::builder(3)
        .name("c")
        .nutrition(Nutrition {
          energy: Some(200.0),
          ..Default::default()
        })
        .build(),
    ];

    let stats = super::compute_stats(&products);
    let energy = &stats.nutrition_stats["energy"];

    assert!(approx_eq!(f64, energy.mean.unwrap(), 200.0));
    assert!(approx_eq!(f64, energy.median.unwrap(), 200.0));
    assert_eq!(energy.min, Some(100.0));
    assert_eq!(energy.max, Some(300.0));

    let salt = &stats.nutrition_stats["salt"];

    assert_eq!(salt.median, Some(0.5));
    assert!(stats.nutrition_stats["fat"].mean.is_none());
    assert_eq!(stats.nutrition_stats.len(), 7);
  }
}
