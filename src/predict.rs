//! Prediction report assembly: endpoint output to per-team predictions,
//! conference ordering, and seed assignment.

use chrono::Utc;

use crate::common::error::{OracleError, Result};
use crate::config::ModelDescriptor;
use crate::domain::{
    Conference, ModelInfo, PredictionReport, PredictionStats, ProjectedTeam, TeamPrediction,
};
use crate::endpoint::{PredictionValue, FEATURE_COLUMNS};

/// Seeds are assigned to the top teams per conference; ten make the
/// play-in/playoff field.
pub const SEEDS_PER_CONFERENCE: usize = 10;

/// Build the prediction report from the submitted teams and the decoded
/// endpoint values, pairing them positionally.
pub fn assemble_report(
    teams: &[ProjectedTeam],
    values: &[PredictionValue],
    model: &ModelDescriptor,
) -> Result<PredictionReport> {
    if teams.len() != values.len() {
        return Err(OracleError::Validation(format!(
            "{} teams but {} prediction values",
            teams.len(),
            values.len()
        )));
    }

    let mut predictions = Vec::with_capacity(teams.len());
    for (team, value) in teams.iter().zip(values) {
        let probability = value.playoff_probability()?;
        predictions.push(TeamPrediction {
            team: team.team.clone(),
            conference: team.conference,
            playoff_probability: round4(probability),
            predicted_seed: None,
            will_make_playoffs: probability >= 0.5,
            stats: PredictionStats {
                wins: team.wins.round() as u32,
                losses: team.losses.round() as u32,
                offensive_rating: team.offensive_rating,
                defensive_rating: team.defensive_rating,
                net_rating: team.net_rating,
            },
        });
    }

    let mut eastern = seeded_conference(&predictions, Conference::Eastern);
    let western = seeded_conference(&predictions, Conference::Western);
    eastern.extend(western);

    Ok(PredictionReport {
        model_info: ModelInfo {
            name: model.name.clone(),
            algorithm: model.algorithm.clone(),
            accuracy: model.accuracy.clone(),
            training_date: model.training_date.clone(),
            prediction_date: Utc::now().format("%Y-%m-%d").to_string(),
            features: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        },
        predictions: eastern,
    })
}

/// One conference, sorted descending by probability, seeds 1..=10 assigned to
/// the top of the order.
fn seeded_conference(predictions: &[TeamPrediction], conference: Conference) -> Vec<TeamPrediction> {
    let mut ranked: Vec<TeamPrediction> = predictions
        .iter()
        .filter(|p| p.conference == conference)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        b.playoff_probability
            .partial_cmp(&a.playoff_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (index, prediction) in ranked.iter_mut().take(SEEDS_PER_CONFERENCE).enumerate() {
        prediction.predicted_seed = Some(index as u8 + 1);
    }
    ranked
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, conference: Conference) -> ProjectedTeam {
        ProjectedTeam {
            team: name.to_string(),
            conference,
            season: 2026,
            wins: 40.0,
            losses: 20.0,
            offensive_rating: 115.0,
            defensive_rating: 111.0,
            net_rating: 4.0,
            pace: 98.0,
            free_throw_rate: 0.25,
            three_point_rate: 0.42,
            true_shooting_pct: 0.58,
        }
    }

    fn model() -> ModelDescriptor {
        ModelDescriptor {
            name: "NBA Playoff Predictor".to_string(),
            algorithm: "XGBoostClassifier".to_string(),
            accuracy: "91.33%".to_string(),
            training_date: "2026-02-19".to_string(),
        }
    }

    /// 15 teams per conference with descending probabilities in shuffled
    /// submission order.
    fn full_league() -> (Vec<ProjectedTeam>, Vec<PredictionValue>) {
        let mut teams = Vec::new();
        let mut values = Vec::new();
        for i in 0..15 {
            teams.push(team(&format!("East {i}"), Conference::Eastern));
            values.push(PredictionValue::Scalar(0.05 + 0.06 * i as f64));
            teams.push(team(&format!("West {i}"), Conference::Western));
            values.push(PredictionValue::Scalar(0.03 + 0.06 * i as f64));
        }
        (teams, values)
    }

    #[test]
    fn every_submitted_team_gets_exactly_one_prediction() {
        let (teams, values) = full_league();
        let report = assemble_report(&teams, &values, &model()).unwrap();
        assert_eq!(report.predictions.len(), 30);
    }

    #[test]
    fn conferences_are_sorted_descending_with_seeds_one_through_ten() {
        let (teams, values) = full_league();
        let report = assemble_report(&teams, &values, &model()).unwrap();

        let eastern: Vec<&TeamPrediction> = report
            .predictions
            .iter()
            .filter(|p| p.conference == Conference::Eastern)
            .collect();
        assert_eq!(eastern.len(), 15);
        assert!(eastern
            .windows(2)
            .all(|w| w[0].playoff_probability >= w[1].playoff_probability));
        assert_eq!(eastern[0].predicted_seed, Some(1));
        assert_eq!(eastern[9].predicted_seed, Some(10));
        assert_eq!(eastern[10].predicted_seed, None);
        // Highest-probability team comes out on top.
        assert_eq!(eastern[0].team, "East 14");
    }

    #[test]
    fn eastern_conference_precedes_western_in_the_report() {
        let (teams, values) = full_league();
        let report = assemble_report(&teams, &values, &model()).unwrap();
        let first_western = report
            .predictions
            .iter()
            .position(|p| p.conference == Conference::Western)
            .unwrap();
        assert!(report.predictions[..first_western]
            .iter()
            .all(|p| p.conference == Conference::Eastern));
    }

    #[test]
    fn qualification_flag_follows_the_half_threshold() {
        let teams = vec![team("A", Conference::Eastern), team("B", Conference::Eastern)];
        let values = vec![PredictionValue::Scalar(0.5), PredictionValue::Scalar(0.49)];
        let report = assemble_report(&teams, &values, &model()).unwrap();
        assert!(report.predictions[0].will_make_playoffs);
        assert!(!report.predictions[1].will_make_playoffs);
    }

    #[test]
    fn probability_is_rounded_to_four_places() {
        let teams = vec![team("A", Conference::Eastern)];
        let values = vec![PredictionValue::Pair([0.123456, 0.876544])];
        let report = assemble_report(&teams, &values, &model()).unwrap();
        assert_eq!(report.predictions[0].playoff_probability, 0.8765);
    }

    #[test]
    fn model_info_carries_the_feature_order() {
        let teams = vec![team("A", Conference::Eastern)];
        let values = vec![PredictionValue::Scalar(0.7)];
        let report = assemble_report(&teams, &values, &model()).unwrap();
        assert_eq!(report.model_info.features.first().map(String::as_str), Some("W"));
        assert_eq!(
            report.model_info.features.last().map(String::as_str),
            Some("TS_Pct")
        );
        assert_eq!(report.model_info.accuracy, "91.33%");
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let teams = vec![team("A", Conference::Eastern)];
        let err = assemble_report(&teams, &[], &model()).unwrap_err();
        assert!(matches!(err, OracleError::Validation(_)));
    }
}
