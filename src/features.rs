//! Feature vector builder: batting line -> per-at-bat rates

use crate::error::SimilarityError;
use crate::types::*;

/// `num / at_bats`, or 0.0 when there are no at-bats
fn safe_rate(num: f64, at_bats: i64) -> f64 {
    if at_bats > 0 {
        num / at_bats as f64
    } else {
        0.0
    }
}

/// Build the normalized rate vector for one batting line.
///
/// Missing counting stats count as zero. A record without `playerID` or
/// `year` is rejected with `MissingField`.
pub fn build_vector(record: &BattingLineRecord) -> Result<HitterVector, SimilarityError> {
    let player_id = record
        .player_id
        .clone()
        .ok_or(SimilarityError::MissingField("playerID"))?;
    let year = record.year.ok_or(SimilarityError::MissingField("year"))?;

    let ab = record.ab.unwrap_or(0);
    let count = |stat: Option<f64>| stat.unwrap_or(0.0);

    let mut features = vec![0.0; FEATURE_COUNT];
    for feature in Feature::ALL {
        let num = match feature {
            Feature::HrRate => count(record.hr),
            Feature::BbRate => count(record.bb),
            Feature::SoRate => count(record.so),
            Feature::HRate => count(record.h),
            Feature::SbRate => count(record.sb),
        };
        features[feature.index()] = safe_rate(num, ab);
    }

    Ok(HitterVector {
        player_id,
        name: record.name.clone().unwrap_or_default(),
        year,
        ab,
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ab: i64, hr: f64, bb: f64, so: f64, h: f64, sb: f64) -> BattingLineRecord {
        BattingLineRecord {
            player_id: Some("p1".to_string()),
            name: Some("Player One".to_string()),
            year: Some(2022),
            ab: Some(ab),
            hr: Some(hr),
            bb: Some(bb),
            so: Some(so),
            h: Some(h),
            sb: Some(sb),
        }
    }

    #[test]
    fn test_build_vector_rates() {
        let v = build_vector(&record(100, 10.0, 20.0, 30.0, 40.0, 5.0)).unwrap();
        assert_eq!(v.features.len(), FEATURE_COUNT);
        assert_eq!(v.features[0], 0.10); // HR/AB
        assert_eq!(v.features[1], 0.20); // BB/AB
        assert_eq!(v.feature(Feature::SbRate), Some(0.05));
        assert_eq!(v.ab, 100);
        assert_eq!(v.name, "Player One");
    }

    #[test]
    fn test_zero_at_bats_yields_zero_rates() {
        let v = build_vector(&record(0, 3.0, 7.0, 1.0, 2.0, 9.0)).unwrap();
        assert!(v.features.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_missing_counting_stats_default_to_zero() {
        let rec = BattingLineRecord {
            player_id: Some("p2".to_string()),
            year: Some(2019),
            ab: Some(50),
            hr: Some(5.0),
            ..Default::default()
        };
        let v = build_vector(&rec).unwrap();
        assert_eq!(v.features, vec![0.1, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(v.name, "");
    }

    #[test]
    fn test_missing_identity_fields() {
        let no_id = BattingLineRecord { year: Some(2020), ..Default::default() };
        assert_eq!(build_vector(&no_id), Err(SimilarityError::MissingField("playerID")));

        let no_year = BattingLineRecord { player_id: Some("x".to_string()), ..Default::default() };
        assert_eq!(build_vector(&no_year), Err(SimilarityError::MissingField("year")));
    }

    #[test]
    fn test_record_deserializes_with_nulls() {
        let rec: BattingLineRecord = serde_json::from_value(serde_json::json!({
            "playerID": "troutmi01",
            "name": null,
            "year": 2019,
            "AB": 470,
            "HR": 45,
            "SB": null
        }))
        .unwrap();
        let v = build_vector(&rec).unwrap();
        assert_eq!(v.name, "");
        assert_eq!(v.feature(Feature::SbRate), Some(0.0));
        assert!((v.features[0] - 45.0 / 470.0).abs() < 1e-12);
    }
}
