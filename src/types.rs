//! Core type definitions for hitter similarity

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Display labels for the feature vector, in vector order
pub const FEATURE_NAMES: [&str; 5] = ["HR/AB", "BB/AB", "SO/AB", "H/AB", "SB/AB"];

/// Number of features in every hitter vector
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Per-at-bat rate features, declared in vector order
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Feature {
    HrRate,
    BbRate,
    SoRate,
    HRate,
    SbRate,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::HrRate,
        Feature::BbRate,
        Feature::SoRate,
        Feature::HRate,
        Feature::SbRate,
    ];

    /// Position of this feature inside a hitter vector
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Writes a feature slice as `{label: value}` in vector order
pub fn serialize_features<S: Serializer>(features: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(features.len()))?;
    for (feature, value) in Feature::ALL.iter().zip(features) {
        map.serialize_entry(feature.label(), value)?;
    }
    map.end()
}

/// One season batting line as handed over by the store.
///
/// Identity fields are optional so their absence can be reported by the
/// vector builder instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattingLineRecord {
    #[serde(rename = "playerID", default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(rename = "AB", default)]
    pub ab: Option<i64>,
    #[serde(rename = "HR", default)]
    pub hr: Option<f64>,
    #[serde(rename = "BB", default)]
    pub bb: Option<f64>,
    #[serde(rename = "SO", default)]
    pub so: Option<f64>,
    #[serde(rename = "H", default)]
    pub h: Option<f64>,
    #[serde(rename = "SB", default)]
    pub sb: Option<f64>,
}

/// Normalized rate vector for one hitter season
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitterVector {
    #[serde(rename = "playerID")]
    pub player_id: String,
    pub name: String,
    pub year: i64,
    #[serde(rename = "AB")]
    pub ab: i64,
    #[serde(serialize_with = "serialize_features")]
    pub features: Vec<f64>,
}

impl HitterVector {
    /// Value of a single feature; `None` only if the vector was built by hand
    /// with fewer than `FEATURE_COUNT` entries
    pub fn feature(&self, feature: Feature) -> Option<f64> {
        self.features.get(feature.index()).copied()
    }
}

/// Per-feature comparison between a target and a candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDelta {
    pub feature: Feature,
    pub target: f64,
    pub candidate: f64,
    pub delta: f64,     // candidate - target
    pub abs_delta: f64,
    pub closeness: f64, // (0, 1], higher means closer
}

/// Why two hitters look alike (or not)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub similarities: Vec<FeatureDelta>,
    pub differences: Vec<FeatureDelta>,
    pub summary: String,
    pub all_features: Vec<FeatureDelta>,
}

/// Player search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    #[serde(rename = "playerID")]
    pub player_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Box-score style season line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonLine {
    #[serde(rename = "playerID")]
    pub player_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub year: i64,
    #[serde(rename = "G", default)]
    pub g: Option<i64>,
    #[serde(rename = "AB", default)]
    pub ab: Option<i64>,
    #[serde(rename = "H", default)]
    pub h: Option<i64>,
    #[serde(rename = "HR", default)]
    pub hr: Option<i64>,
    #[serde(rename = "BB", default)]
    pub bb: Option<i64>,
    #[serde(rename = "SO", default)]
    pub so: Option<i64>,
    #[serde(rename = "R", default)]
    pub r: Option<i64>,
}

/// Request for hitters similar to one player season
#[derive(Debug, Clone)]
pub struct SimilarRequest {
    pub player_id: String,
    pub year: i64,
    pub k: usize,
    pub min_ab: i64,
}

/// Ranked result entry of a similarity query
#[derive(Debug, Clone, Serialize)]
pub struct SimilarHitter {
    #[serde(rename = "playerID")]
    pub player_id: String,
    pub name: String,
    pub year: i64,
    #[serde(rename = "AB")]
    pub ab: i64,
    pub similarity: f64, // rounded to 6 decimals
    pub explanation: Explanation,
    #[serde(serialize_with = "serialize_features")]
    pub features: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarParams {
    pub k: usize,
    pub min_ab: i64,
}

/// Response of a similarity query
#[derive(Debug, Clone, Serialize)]
pub struct SimilarResponse {
    pub target: HitterVector,
    pub feature_definition: [&'static str; FEATURE_COUNT],
    pub results: Vec<SimilarHitter>,
    pub params: SimilarParams,
}
