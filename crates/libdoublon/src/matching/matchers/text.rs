use crate::matching::{Feature, MatchInput, extractors::cosine};

/// Cosine similarity between the embedding vectors of both records'
/// normalized name-and-brand text. The vectors themselves come from the
/// embedding provider; a record without one scores 0.
pub(crate) struct TextEmbeddingCosine;

impl Feature for TextEmbeddingCosine {
  fn name(&self) -> &'static str {
    "text_embedding_cosine"
  }

  fn score_feature(&self, lhs: &MatchInput, rhs: &MatchInput) -> f64 {
    match (lhs.vector, rhs.vector) {
      (Some(lhs), Some(rhs)) => cosine(lhs, rhs),
      _ => 0.0,
    }
  }
}
