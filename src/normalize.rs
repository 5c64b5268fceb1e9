//! Team-season normalizer.
//!
//! Turns loosely-typed rows from either source (HTML table parse or CSV
//! export) into clean `TeamSeasonRecord`s: aggregate rows dropped, team names
//! cleaned, columns renamed to the canonical set, playoff membership derived,
//! percentage columns brought onto the [0,1] scale, and incomplete rows
//! discarded. One deterministic pass, no retries, no caching.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::common::error::{OracleError, Result};
use crate::domain::{RawRow, TeamSeasonRecord};

/// Trailing symbol sources put on a team name to mark playoff qualification.
const ELIGIBILITY_MARKER: char = '*';

/// Row labels that describe aggregates rather than individual teams.
const AGGREGATE_LABELS: [&str; 3] = ["League Average", "Division", "Conference"];

/// Fixed mapping from source column names to canonical attribute names.
/// Unrecognized source columns are dropped.
pub const COLUMN_MAP: [(&str, &str); 11] = [
    ("W", "Wins"),
    ("L", "Losses"),
    ("W/L%", "WinPct"),
    ("ORtg", "OffensiveRating"),
    ("DRtg", "DefensiveRating"),
    ("NRtg", "NetRating"),
    ("3P%", "ThreePointPct"),
    ("FT%", "FreeThrowPct"),
    ("TRB%", "ReboundPct"),
    ("AST%", "AssistPct"),
    ("TOV%", "TurnoverPct"),
];

/// A row part-way through normalization: name cleaned, values coerced, but
/// batch-wide decisions (percentage rescale) not yet applied.
#[derive(Debug, Clone, Default)]
struct Candidate {
    team: String,
    had_marker: bool,
    wins: Option<f64>,
    losses: Option<f64>,
    win_pct: Option<f64>,
    offensive_rating: Option<f64>,
    defensive_rating: Option<f64>,
    net_rating: Option<f64>,
    three_point_pct: Option<f64>,
    free_throw_pct: Option<f64>,
    rebound_pct: Option<f64>,
    assist_pct: Option<f64>,
    turnover_pct: Option<f64>,
}

/// Accessors for the percentage-valued columns, used for the batch-wide
/// rescale decision.
const PCT_FIELDS: [fn(&mut Candidate) -> &mut Option<f64>; 6] = [
    |c| &mut c.win_pct,
    |c| &mut c.three_point_pct,
    |c| &mut c.free_throw_pct,
    |c| &mut c.rebound_pct,
    |c| &mut c.assist_pct,
    |c| &mut c.turnover_pct,
];

/// Normalize a batch of raw rows for one season.
///
/// `known_playoff_teams` is the authoritative roster for that season; it may
/// be empty for sources that encode qualification with a trailing marker on
/// the team name. Output order is input order with discarded rows removed.
/// Fails only when no usable row remains.
pub fn normalize(
    raw_rows: &[RawRow],
    season: u16,
    known_playoff_teams: &HashSet<String>,
) -> Result<Vec<TeamSeasonRecord>> {
    let mut candidates: Vec<Candidate> = raw_rows
        .iter()
        .filter_map(|row| coerce_row(row))
        .collect();

    rescale_percentages(&mut candidates);

    let mut records = Vec::with_capacity(candidates.len());
    let mut seen_teams = HashSet::new();
    for candidate in candidates {
        // Team name is unique within a season; a repeated row is source
        // noise and the first occurrence stands.
        if !seen_teams.insert(candidate.team.clone()) {
            warn!(season, team = %candidate.team, "dropping duplicate team row");
            continue;
        }
        match finish(candidate, season, known_playoff_teams) {
            Some(record) => records.push(record),
            None => debug!("dropping row with missing wins/losses"),
        }
    }

    if records.is_empty() {
        return Err(OracleError::Validation(format!(
            "no usable team-season rows for season {season}"
        )));
    }
    debug!(season, teams = records.len(), "normalized season batch");
    Ok(records)
}

/// Per-row phase: filtering, name cleaning, column mapping, numeric coercion.
/// Returns `None` for rows that are not individual teams.
fn coerce_row(row: &RawRow) -> Option<Candidate> {
    let raw_name = row.get("Team").unwrap_or("").trim();
    if raw_name.is_empty() {
        return None;
    }
    if AGGREGATE_LABELS.iter().any(|label| raw_name.contains(label)) {
        return None;
    }

    let had_marker = raw_name.ends_with(ELIGIBILITY_MARKER);
    let team = raw_name.trim_end_matches(ELIGIBILITY_MARKER).trim().to_string();
    if team.is_empty() {
        return None;
    }

    let mut candidate = Candidate {
        team,
        had_marker,
        ..Candidate::default()
    };
    for (source, canonical) in COLUMN_MAP {
        let value = numeric(row, source);
        match canonical {
            "Wins" => candidate.wins = value,
            "Losses" => candidate.losses = value,
            "WinPct" => candidate.win_pct = value,
            "OffensiveRating" => candidate.offensive_rating = value,
            "DefensiveRating" => candidate.defensive_rating = value,
            "NetRating" => candidate.net_rating = value,
            "ThreePointPct" => candidate.three_point_pct = value,
            "FreeThrowPct" => candidate.free_throw_pct = value,
            "ReboundPct" => candidate.rebound_pct = value,
            "AssistPct" => candidate.assist_pct = value,
            "TurnoverPct" => candidate.turnover_pct = value,
            _ => unreachable!("unmapped canonical column {canonical}"),
        }
    }
    Some(candidate)
}

/// Coerce one cell to a number; failures become missing values, not errors.
fn numeric(row: &RawRow, column: &str) -> Option<f64> {
    let text = row.get(column)?.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!(column, value = text, "non-numeric cell treated as missing");
            None
        }
    }
}

/// Batch-wide scale decision: a percentage column whose maximum observed
/// value exceeds 1 is assumed to be on the 0-100 scale and is divided by 100
/// as a whole. Columns already in [0,1] are left untouched.
fn rescale_percentages(candidates: &mut [Candidate]) {
    for accessor in PCT_FIELDS {
        let max = candidates
            .iter_mut()
            .filter_map(|c| *accessor(c))
            .fold(f64::MIN, f64::max);
        if max > 1.0 {
            for candidate in candidates.iter_mut() {
                if let Some(value) = accessor(candidate).as_mut() {
                    *value /= 100.0;
                }
            }
        }
    }
}

/// Derived fields and the completeness filter. Playoff membership is never
/// read from a source column: it is true when the roster lists the team or
/// the raw name carried the eligibility marker.
fn finish(
    candidate: Candidate,
    season: u16,
    known_playoff_teams: &HashSet<String>,
) -> Option<TeamSeasonRecord> {
    let wins = to_count(candidate.wins)?;
    let losses = to_count(candidate.losses)?;
    let made_playoffs = candidate.had_marker || known_playoff_teams.contains(&candidate.team);

    let net_rating = candidate.net_rating.or_else(|| {
        match (candidate.offensive_rating, candidate.defensive_rating) {
            (Some(off), Some(def)) => Some(off - def),
            _ => None,
        }
    });

    Some(TeamSeasonRecord {
        team: candidate.team,
        season,
        wins,
        losses,
        win_pct: candidate.win_pct,
        offensive_rating: candidate.offensive_rating,
        defensive_rating: candidate.defensive_rating,
        net_rating,
        three_point_pct: candidate.three_point_pct,
        free_throw_pct: candidate.free_throw_pct,
        rebound_pct: candidate.rebound_pct,
        assist_pct: candidate.assist_pct,
        turnover_pct: candidate.turnover_pct,
        made_playoffs,
    })
}

fn to_count(value: Option<f64>) -> Option<u32> {
    match value {
        Some(v) if v >= 0.0 => Some(v.round() as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().copied().collect()
    }

    fn no_roster() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn marker_strips_and_sets_playoff_flag() {
        let rows = vec![row(&[
            ("Team", "Boston Celtics*"),
            ("W", "57"),
            ("L", "25"),
            ("3P%", "38.1"),
        ])];
        let records = normalize(&rows, 2024, &no_roster()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.team, "Boston Celtics");
        assert_eq!(record.wins, 57);
        assert_eq!(record.losses, 25);
        assert!(record.made_playoffs);
        // Batch max of 3P% is 38.1 > 1, so the column is rescaled.
        assert!((record.three_point_pct.unwrap() - 0.381).abs() < 1e-9);
    }

    #[test]
    fn roster_membership_sets_playoff_flag_without_marker() {
        let roster: HashSet<String> = ["Denver Nuggets".to_string()].into_iter().collect();
        let rows = vec![
            row(&[("Team", "Denver Nuggets"), ("W", "53"), ("L", "29")]),
            row(&[("Team", "Portland Trail Blazers"), ("W", "33"), ("L", "49")]),
        ];
        let records = normalize(&rows, 2023, &roster).unwrap();
        assert!(records[0].made_playoffs);
        assert!(!records[1].made_playoffs);
    }

    #[test]
    fn aggregate_and_empty_rows_are_excluded() {
        let rows = vec![
            row(&[("Team", "League Average"), ("W", "41"), ("L", "41")]),
            row(&[("Team", "Atlantic Division"), ("W", "44"), ("L", "38")]),
            row(&[("Team", "  "), ("W", "44"), ("L", "38")]),
            row(&[("Team", "Miami Heat"), ("W", "44"), ("L", "38")]),
        ];
        let records = normalize(&rows, 2022, &no_roster()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].team, "Miami Heat");
    }

    #[test]
    fn percentages_already_in_unit_range_are_left_alone() {
        let rows = vec![
            row(&[("Team", "Miami Heat"), ("W", "44"), ("L", "38"), ("FT%", "0.801")]),
            row(&[("Team", "Chicago Bulls"), ("W", "40"), ("L", "42"), ("FT%", "0.772")]),
        ];
        let records = normalize(&rows, 2022, &no_roster()).unwrap();
        assert_eq!(records[0].free_throw_pct, Some(0.801));
        assert_eq!(records[1].free_throw_pct, Some(0.772));
    }

    #[test]
    fn rescale_is_batch_wide_not_per_row() {
        // One in-range value in a column whose max exceeds 1 is still divided.
        let rows = vec![
            row(&[("Team", "Miami Heat"), ("W", "44"), ("L", "38"), ("TRB%", "0.9")]),
            row(&[("Team", "Chicago Bulls"), ("W", "40"), ("L", "42"), ("TRB%", "51.2")]),
        ];
        let records = normalize(&rows, 2022, &no_roster()).unwrap();
        assert!((records[0].rebound_pct.unwrap() - 0.009).abs() < 1e-9);
        assert!((records[1].rebound_pct.unwrap() - 0.512).abs() < 1e-9);
    }

    #[test]
    fn net_rating_is_derived_when_absent() {
        let rows = vec![row(&[
            ("Team", "Miami Heat"),
            ("W", "44"),
            ("L", "38"),
            ("ORtg", "113.0"),
            ("DRtg", "110.5"),
        ])];
        let records = normalize(&rows, 2022, &no_roster()).unwrap();
        assert!((records[0].net_rating.unwrap() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn explicit_net_rating_wins_over_derivation() {
        let rows = vec![row(&[
            ("Team", "Miami Heat"),
            ("W", "44"),
            ("L", "38"),
            ("ORtg", "113.0"),
            ("DRtg", "110.5"),
            ("NRtg", "2.4"),
        ])];
        let records = normalize(&rows, 2022, &no_roster()).unwrap();
        assert_eq!(records[0].net_rating, Some(2.4));
    }

    #[test]
    fn rows_missing_wins_or_losses_are_discarded() {
        let rows = vec![
            row(&[("Team", "Miami Heat"), ("W", "44")]),
            row(&[("Team", "Chicago Bulls"), ("W", "forty"), ("L", "42")]),
            row(&[("Team", "Boston Celtics"), ("W", "57"), ("L", "25")]),
        ];
        let records = normalize(&rows, 2022, &no_roster()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].team, "Boston Celtics");
    }

    #[test]
    fn unrecognized_columns_are_dropped() {
        let rows = vec![row(&[
            ("Team", "Miami Heat"),
            ("W", "44"),
            ("L", "38"),
            ("Arena", "Kaseya Center"),
        ])];
        // No field of the record should pick up the unknown column; the row
        // itself still normalizes fine.
        let records = normalize(&rows, 2022, &no_roster()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn duplicate_team_rows_keep_the_first_occurrence() {
        let rows = vec![
            row(&[("Team", "Miami Heat"), ("W", "44"), ("L", "38")]),
            row(&[("Team", "Miami Heat"), ("W", "10"), ("L", "72")]),
            row(&[("Team", "Miami Heat*"), ("W", "50"), ("L", "32")]),
        ];
        let records = normalize(&rows, 2022, &no_roster()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].wins, 44);
        // The marker on the dropped repeat does not leak into the kept row.
        assert!(!records[0].made_playoffs);
    }

    #[test]
    fn empty_result_is_a_validation_error() {
        let rows = vec![row(&[("Team", "League Average"), ("W", "41"), ("L", "41")])];
        let err = normalize(&rows, 2022, &no_roster()).unwrap_err();
        assert!(matches!(err, OracleError::Validation(_)));
    }

    #[test]
    fn output_preserves_input_order() {
        let rows = vec![
            row(&[("Team", "Utah Jazz"), ("W", "37"), ("L", "45")]),
            row(&[("Team", "League Average"), ("W", "41"), ("L", "41")]),
            row(&[("Team", "Phoenix Suns"), ("W", "45"), ("L", "37")]),
        ];
        let records = normalize(&rows, 2024, &no_roster()).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(names, vec!["Utah Jazz", "Phoenix Suns"]);
    }
}
