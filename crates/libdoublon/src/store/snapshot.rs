use std::path::Path;

use anyhow::Context;
use serde_jsonlines::json_lines;

use crate::model::Product;

/// Load a catalog snapshot from a JSON-lines export, one product per line.
///
/// Records that were hard-deleted upstream never make it into the export;
/// superseded records do, with `superseded_by` and `deleted_at` set, so a
/// restart preserves the deduplication trail.
pub fn load_snapshot(path: impl AsRef<Path>) -> anyhow::Result<Vec<Product>> {
  let path = path.as_ref();
  let products = json_lines::<Product, _>(path)
    .with_context(|| format!("could not open catalog snapshot {}", path.display()))?
    .collect::<Result<Vec<_>, _>>()
    .with_context(|| format!("invalid catalog snapshot {}", path.display()))?;

  tracing::info!(products = products.len(), path = %path.display(), "loaded catalog snapshot");

  Ok(products)
}
