use std::sync::LazyLock;

use any_ascii::any_ascii;
use regex::Regex;

pub(crate) static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
pub(crate) static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Clean free text the same way the similarity pipeline always has:
/// transliterate to ASCII, lowercase, drop everything outside `[a-z0-9 ]`
/// and collapse runs of whitespace.
pub(crate) fn normalize(text: &str) -> String {
  let lowered = any_ascii(text).to_lowercase();
  let stripped = NON_ALPHANUMERIC.replace_all(&lowered, "");

  WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Cosine similarity clamped to `[0, 1]`. Mismatched dimensions and
/// zero-norm vectors score 0 rather than failing the comparison.
pub(crate) fn cosine(lhs: &[f32], rhs: &[f32]) -> f64 {
  if lhs.len() != rhs.len() || lhs.is_empty() {
    return 0.0;
  }

  let mut dot = 0.0f64;
  let mut lhs_norm = 0.0f64;
  let mut rhs_norm = 0.0f64;

  for (l, r) in lhs.iter().zip(rhs.iter()) {
    dot += f64::from(*l) * f64::from(*r);
    lhs_norm += f64::from(*l) * f64::from(*l);
    rhs_norm += f64::from(*r) * f64::from(*r);
  }

  if lhs_norm == 0.0 || rhs_norm == 0.0 {
    return 0.0;
  }

  (dot / (lhs_norm.sqrt() * rhs_norm.sqrt())).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
  use float_cmp::approx_eq;

  #[test]
  fn normalize_strips_and_collapses() {
    assert_eq!(super::normalize("  Grüne   Äpfel (Bio)! "), "grune apfel bio");
    assert_eq!(super::normalize("Coca-Cola"), "cocacola");
    assert_eq!(super::normalize(""), "");
  }

  #[test]
  fn cosine_bounds() {
    assert_eq!(super::cosine(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
    assert_eq!(super::cosine(&[1.0, 0.0], &[0.0, 1.0]), 0.0);

    // Negative cosine is clamped, not propagated.
    assert_eq!(super::cosine(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);

    // Dimension mismatch and zero vectors degrade to zero.
    assert_eq!(super::cosine(&[1.0], &[1.0, 0.0]), 0.0);
    assert_eq!(super::cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
  }

  #[test]
  fn cosine_partial_overlap() {
    let score = super::cosine(&[1.0, 1.0], &[1.0, 0.0]);

    assert!(approx_eq!(f64, score, 1.0 / 2.0f64.sqrt(), epsilon = 1e-9));
  }
}
