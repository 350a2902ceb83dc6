//! Cosine similarity and top-k ranking of hitter vectors

use crate::error::SimilarityError;
use crate::types::{HitterVector, FEATURE_COUNT};

pub(crate) fn check_dimensions(a: &[f64], b: &[f64]) -> Result<(), SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Both slices must be full hitter feature vectors
pub(crate) fn check_feature_vectors(a: &[f64], b: &[f64]) -> Result<(), SimilarityError> {
    for v in [a, b] {
        if v.len() != FEATURE_COUNT {
            return Err(SimilarityError::DimensionMismatch {
                expected: FEATURE_COUNT,
                actual: v.len(),
            });
        }
    }
    Ok(())
}

/// Cosine similarity in [-1, 1]; 0.0 if either vector has zero norm
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, SimilarityError> {
    check_dimensions(a, b)?;

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

/// Rank candidates by similarity to `target`, best first, at most `k`.
///
/// Candidates sharing the target's `player_id` are skipped. Equal scores keep
/// their input order.
pub fn rank<'a>(
    target: &HitterVector,
    candidates: &'a [HitterVector],
    k: usize,
) -> Result<Vec<(&'a HitterVector, f64)>, SimilarityError> {
    let mut scored = Vec::with_capacity(candidates.len());
    for cand in candidates {
        if cand.player_id == target.player_id {
            continue;
        }
        check_feature_vectors(&target.features, &cand.features)?;
        let score = cosine_similarity(&target.features, &cand.features)?;
        scored.push((cand, score));
    }

    // sort_by is stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k);
    Ok(scored)
}

/// Round a score for display
pub fn round_score(score: f64) -> f64 {
    (score * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hitter(id: &str, features: Vec<f64>) -> HitterVector {
        HitterVector {
            player_id: id.to_string(),
            name: id.to_uppercase(),
            year: 2022,
            ab: 100,
            features,
        }
    }

    #[test]
    fn test_cosine_similarity_identity_is_1() {
        let a = [1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-9);

        let rates = [0.05, 0.11, 0.23, 0.27, 0.02];
        assert!((cosine_similarity(&rates, &rates).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_zero_norm() {
        let zero = [0.0; 5];
        let other = [0.1, 0.1, 0.2, 0.3, 0.0];
        assert_eq!(cosine_similarity(&zero, &other).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        let err = cosine_similarity(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(err, SimilarityError::DimensionMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_rank_excludes_self() {
        let t = hitter("t", vec![0.1, 0.1, 0.1, 0.3, 0.0]);
        let c1 = hitter("c1", vec![0.1, 0.1, 0.1, 0.3, 0.0]);
        // same player, different line: still excluded
        let c2 = hitter("t", vec![0.0, 0.0, 0.0, 0.0, 0.0]);
        let candidates = vec![c1, c2];

        let res = rank(&t, &candidates, 10).unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].0.player_id, "c1");
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let t = hitter("t", vec![0.1, 0.1, 0.2, 0.3, 0.0]);
        let candidates = vec![
            hitter("far", vec![0.0, 0.0, 0.0, 0.0, 0.5]),
            hitter("near", vec![0.1, 0.1, 0.2, 0.3, 0.01]),
            hitter("mid", vec![0.3, 0.0, 0.1, 0.1, 0.1]),
        ];

        let all = rank(&t, &candidates, 10).unwrap();
        assert_eq!(all.len(), 3);
        let ids: Vec<&str> = all.iter().map(|(h, _)| h.player_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(all.windows(2).all(|w| w[0].1 >= w[1].1));

        let top = rank(&t, &candidates, 2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0.player_id, "near");

        assert!(rank(&t, &candidates, 0).unwrap().is_empty());
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let t = hitter("t", vec![0.1, 0.1, 0.2, 0.3, 0.0]);
        let same = vec![0.05, 0.12, 0.2, 0.25, 0.03];
        let candidates = vec![
            hitter("b", same.clone()),
            hitter("a", same.clone()),
            hitter("c", same),
        ];
        let res = rank(&t, &candidates, 3).unwrap();
        let ids: Vec<&str> = res.iter().map(|(h, _)| h.player_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rank_rejects_short_candidate() {
        let t = hitter("t", vec![0.1, 0.1, 0.2, 0.3, 0.0]);
        let candidates = vec![hitter("bad", vec![0.1, 0.1])];
        assert!(matches!(
            rank(&t, &candidates, 5),
            Err(SimilarityError::DimensionMismatch { expected: 5, actual: 2 })
        ));
    }

    #[test]
    fn test_rank_rejects_equal_but_wrong_length_vectors() {
        let t = hitter("t", vec![0.1; 7]);
        let candidates = vec![hitter("c", vec![0.2; 7])];
        assert_eq!(
            rank(&t, &candidates, 5).unwrap_err(),
            SimilarityError::DimensionMismatch { expected: 5, actual: 7 }
        );

        let t = hitter("t", vec![0.1; 3]);
        let candidates = vec![hitter("c", vec![0.2; 3])];
        assert_eq!(
            rank(&t, &candidates, 5).unwrap_err(),
            SimilarityError::DimensionMismatch { expected: 5, actual: 3 }
        );
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.123456789), 0.123457);
        assert_eq!(round_score(1.0), 1.0);
    }
}
