use std::{sync::Arc, time::Instant};

use ahash::HashMap;
use itertools::Itertools;
use metrics::histogram;
use rayon::prelude::*;
use serde::Serialize;
use tracing::instrument;

use crate::{
  matching::MatchInput,
  model::{Product, Weights},
  scoring::{self, Components},
};

#[derive(Clone, Debug, Serialize)]
pub struct RankedHit {
  #[serde(flatten)]
  pub product: Product,
  pub score: f64,
  pub components: Components,
}

/// Score every candidate against the query and keep the `top_n` best.
///
/// Scoring is read-only over an immutable snapshot, so candidates are
/// processed in parallel. The ordering is total and reproducible: descending
/// score, ties broken by ascending id.
#[instrument(name = "rank_candidates", skip_all, fields(query_id = query.product.id, candidates = candidates.len()))]
pub(crate) fn rank_candidates(query: &MatchInput, candidates: &[Product], vectors: &HashMap<i64, Arc<Vec<f32>>>, weights: &Weights, top_n: usize) -> Vec<RankedHit> {
  let then = Instant::now();

  let hits = candidates
    .par_iter()
    .map(|candidate| {
      let vector = vectors.get(&candidate.id).map(|v| v.as_slice());
      let rhs = MatchInput::new(candidate, vector);
      let (score, components) = scoring::composite(query, &rhs, weights);

      RankedHit {
        product: candidate.clone(),
        score,
        components,
      }
    })
    .collect::<Vec<_>>();

  histogram!("doublon_ranking_latency_seconds").record(then.elapsed().as_secs_f64());

  hits
    .into_iter()
    .sorted_by(|lhs, rhs| lhs.score.total_cmp(&rhs.score).reverse().then_with(|| lhs.product.id.cmp(&rhs.product.id)))
    .take(top_n)
    .collect()
}
