//! Per-feature deltas and human-readable similarity explanations

use crate::error::SimilarityError;
use crate::scoring::check_feature_vectors;
use crate::types::*;

/// Keeps `closeness` strictly below 1 and away from a zero denominator
const CLOSENESS_EPS: f64 = 1e-12;

fn fmt3(x: f64) -> String {
    format!("{:.3}", x)
}

/// Compare two feature slices feature by feature, in vector order
pub fn compute_feature_deltas(
    target: &[f64],
    candidate: &[f64],
) -> Result<Vec<FeatureDelta>, SimilarityError> {
    check_feature_vectors(target, candidate)?;

    let deltas = Feature::ALL
        .iter()
        .zip(target.iter().zip(candidate.iter()))
        .map(|(&feature, (&t, &c))| {
            let delta = c - t;
            let abs_delta = delta.abs();
            FeatureDelta {
                feature,
                target: t,
                candidate: c,
                delta,
                abs_delta,
                closeness: 1.0 / (1.0 + abs_delta + CLOSENESS_EPS),
            }
        })
        .collect();

    Ok(deltas)
}

/// Top `n` deltas by `key`, highest first; ties keep feature order
fn top_by<F>(deltas: &[FeatureDelta], n: usize, key: F) -> Vec<FeatureDelta>
where
    F: Fn(&FeatureDelta) -> f64,
{
    let mut sorted = deltas.to_vec();
    sorted.sort_by(|a, b| key(b).total_cmp(&key(a)));
    sorted.truncate(n.min(FEATURE_COUNT));
    sorted
}

fn similarity_phrase(d: &FeatureDelta) -> String {
    format!(
        "{} is similar ({} vs {})",
        d.feature.label(),
        fmt3(d.target),
        fmt3(d.candidate)
    )
}

fn difference_phrase(d: &FeatureDelta) -> String {
    let direction = if d.delta > 0.0 { "higher" } else { "lower" };
    format!(
        "{} is {} for the candidate ({} vs {})",
        d.feature.label(),
        direction,
        fmt3(d.candidate),
        fmt3(d.target)
    )
}

fn render_summary(similarities: &[FeatureDelta], differences: &[FeatureDelta]) -> String {
    let mut summary = String::new();

    if !similarities.is_empty() {
        let bits: Vec<String> = similarities.iter().map(similarity_phrase).collect();
        summary.push_str("Similar: ");
        summary.push_str(&bits.join(", "));
        summary.push_str(". ");
    }
    if !differences.is_empty() {
        let bits: Vec<String> = differences.iter().map(difference_phrase).collect();
        summary.push_str("Key differences: ");
        summary.push_str(&bits.join(", "));
        summary.push('.');
    }

    summary.trim().to_string()
}

/// Explain why `candidate` resembles (or differs from) `target`.
///
/// Similarities and differences are selected independently and may name the
/// same feature. Counts above the feature count are clamped.
pub fn explain(
    target: &HitterVector,
    candidate: &HitterVector,
    top_similar: usize,
    top_different: usize,
) -> Result<Explanation, SimilarityError> {
    let all_features = compute_feature_deltas(&target.features, &candidate.features)?;

    let similarities = top_by(&all_features, top_similar, |d| d.closeness);
    let differences = top_by(&all_features, top_different, |d| d.abs_delta);
    let summary = render_summary(&similarities, &differences);

    Ok(Explanation {
        similarities,
        differences,
        summary,
        all_features,
    })
}
