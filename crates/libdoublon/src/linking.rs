use std::collections::BTreeSet;

use ahash::HashMap;
use jiff::Timestamp;
use serde::Serialize;

use crate::{error::DoublonError, model::Product};

/// The committed result of a merge: the updated master and the ids it now
/// supersedes.
#[derive(Clone, Debug, Serialize)]
pub struct MergeOutcome {
  pub master: Product,
  pub superseded: Vec<i64>,
}

pub(crate) struct MergePlan {
  master_id: i64,
  duplicate_ids: Vec<i64>,
  merged_barcodes: BTreeSet<String>,
}

/// Validate a merge request against a consistent snapshot of the catalog.
///
/// This performs no mutation at all, so a failed validation leaves the
/// catalog untouched by construction. Rejections follow the taxonomy:
/// malformed requests and unknown or ineligible masters are `InvalidMerge`,
/// a duplicate that has already been linked away is `AlreadyLinked` (which
/// also makes a committed merge safe to retry: the second attempt is
/// rejected without side effects).
pub(crate) fn plan_merge(records: &HashMap<i64, Product>, master_id: i64, duplicate_ids: &[i64]) -> Result<MergePlan, DoublonError> {
  if duplicate_ids.is_empty() {
    return Err(DoublonError::InvalidMerge("empty duplicate set".to_string()));
  }

  if duplicate_ids.contains(&master_id) {
    return Err(DoublonError::InvalidMerge(format!("master {master_id} cannot appear among the duplicates")));
  }

  let Some(master) = records.get(&master_id) else {
    return Err(DoublonError::InvalidMerge(format!("unknown product {master_id}")));
  };

  // A superseded record can never become a master, which keeps merge chains
  // at a single hop.
  if !master.is_eligible() {
    return Err(DoublonError::InvalidMerge(format!("master {master_id} is not eligible")));
  }

  let mut merged_barcodes = master.barcodes.clone();
  let mut duplicates = Vec::with_capacity(duplicate_ids.len());

  for id in duplicate_ids {
    let Some(duplicate) = records.get(id) else {
      return Err(DoublonError::InvalidMerge(format!("unknown product {id}")));
    };

    if !duplicate.is_eligible() {
      return Err(DoublonError::AlreadyLinked);
    }

    if !duplicates.contains(id) {
      merged_barcodes.extend(duplicate.barcodes.iter().cloned());
      duplicates.push(*id);
    }
  }

  Ok(MergePlan {
    master_id,
    duplicate_ids: duplicates,
    merged_barcodes,
  })
}

/// Apply a validated plan. The caller must hold the writer lock and must
/// apply the plan to the same snapshot it was computed from.
pub(crate) fn apply_plan(records: &mut HashMap<i64, Product>, plan: MergePlan, now: Timestamp) -> MergeOutcome {
  for id in &plan.duplicate_ids {
    if let Some(duplicate) = records.get_mut(id) {
      duplicate.superseded_by = Some(plan.master_id);
      duplicate.deleted_at = Some(now);
      duplicate.barcodes.clear();
      duplicate.version += 1;
    }
  }

  let master = records.get_mut(&plan.master_id).expect("validated master is present");

  master.barcodes = plan.merged_barcodes;
  master.version += 1;

  MergeOutcome {
    master: master.clone(),
    superseded: plan.duplicate_ids,
  }
}
