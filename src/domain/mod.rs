use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A loosely-typed row as it comes off a source, before normalization.
///
/// Keys are the source's own column names (`"W"`, `"3P%"`, ...); values are
/// the untyped cell contents. Both the HTML table parser and the CSV export
/// reader produce these.
///
/// The first value per column name wins. Source tables repeat column names
/// across sections (the Advanced table carries `TOV%` in both the offense
/// and defense four-factors blocks), and the mapped statistic is the first
/// occurrence, never the opponent-side repeat.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    values: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.entry(column.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// One team's line for one season, after normalization.
///
/// Serde names match the historical-dataset CSV header, so this struct is
/// both the in-memory record and the flat-file row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeasonRecord {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Season")]
    pub season: u16,
    #[serde(rename = "Wins")]
    pub wins: u32,
    #[serde(rename = "Losses")]
    pub losses: u32,
    #[serde(rename = "WinPct")]
    pub win_pct: Option<f64>,
    #[serde(rename = "OffensiveRating")]
    pub offensive_rating: Option<f64>,
    #[serde(rename = "DefensiveRating")]
    pub defensive_rating: Option<f64>,
    #[serde(rename = "NetRating")]
    pub net_rating: Option<f64>,
    #[serde(rename = "ThreePointPct")]
    pub three_point_pct: Option<f64>,
    #[serde(rename = "FreeThrowPct")]
    pub free_throw_pct: Option<f64>,
    #[serde(rename = "ReboundPct")]
    pub rebound_pct: Option<f64>,
    #[serde(rename = "AssistPct")]
    pub assist_pct: Option<f64>,
    #[serde(rename = "TurnoverPct")]
    pub turnover_pct: Option<f64>,
    #[serde(rename = "MadePlayoffs", with = "playoff_flag")]
    pub made_playoffs: bool,
}

/// The dataset encodes the playoff flag as 0/1, matching the upstream
/// training-data convention.
mod playoff_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        Ok(raw != 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    Eastern,
    Western,
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conference::Eastern => write!(f, "Eastern"),
            Conference::Western => write!(f, "Western"),
        }
    }
}

/// Projected mid-season statistics for one team, as fed to the inference
/// endpoint. Serde names match the training columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectedTeam {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Conference")]
    pub conference: Conference,
    #[serde(rename = "Season")]
    pub season: u16,
    #[serde(rename = "W")]
    pub wins: f64,
    #[serde(rename = "L")]
    pub losses: f64,
    #[serde(rename = "ORtg")]
    pub offensive_rating: f64,
    #[serde(rename = "DRtg")]
    pub defensive_rating: f64,
    #[serde(rename = "NRtg")]
    pub net_rating: f64,
    #[serde(rename = "Pace")]
    pub pace: f64,
    #[serde(rename = "FTr")]
    pub free_throw_rate: f64,
    #[serde(rename = "ThreePAr")]
    pub three_point_rate: f64,
    #[serde(rename = "TS_Pct")]
    pub true_shooting_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionStats {
    pub wins: u32,
    pub losses: u32,
    pub offensive_rating: f64,
    pub defensive_rating: f64,
    pub net_rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPrediction {
    pub team: String,
    pub conference: Conference,
    pub playoff_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_seed: Option<u8>,
    pub will_make_playoffs: bool,
    pub stats: PredictionStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub algorithm: String,
    pub accuracy: String,
    pub training_date: String,
    pub prediction_date: String,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub model_info: ModelInfo,
    pub predictions: Vec<TeamPrediction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_row_lookup() {
        let row: RawRow = [("Team", "Boston Celtics"), ("W", "57")].into_iter().collect();
        assert_eq!(row.get("Team"), Some("Boston Celtics"));
        assert_eq!(row.get("W"), Some("57"));
        assert_eq!(row.get("L"), None);
    }

    #[test]
    fn first_value_wins_on_repeated_column() {
        let mut row = RawRow::new();
        row.insert("TOV%", "11.2");
        row.insert("TOV%", "14.9");
        assert_eq!(row.get("TOV%"), Some("11.2"));
    }

    #[test]
    fn conference_serializes_as_plain_name() {
        let json = serde_json::to_string(&Conference::Eastern).unwrap();
        assert_eq!(json, "\"Eastern\"");
        let back: Conference = serde_json::from_str("\"Western\"").unwrap();
        assert_eq!(back, Conference::Western);
    }

    #[test]
    fn prediction_serializes_camel_case_and_skips_missing_seed() {
        let prediction = TeamPrediction {
            team: "Utah Jazz".to_string(),
            conference: Conference::Western,
            playoff_probability: 0.12,
            predicted_seed: None,
            will_make_playoffs: false,
            stats: PredictionStats {
                wins: 18,
                losses: 42,
                offensive_rating: 109.6,
                defensive_rating: 117.4,
                net_rating: -7.8,
            },
        };
        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["playoffProbability"], 0.12);
        assert_eq!(json["willMakePlayoffs"], false);
        assert!(json.get("predictedSeed").is_none());
        assert_eq!(json["stats"]["offensiveRating"], 109.6);
    }
}
