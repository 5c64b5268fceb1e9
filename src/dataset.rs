//! The historical dataset: a flat CSV of `TeamSeasonRecord`s, one row per
//! team per season, plus the summary printed by `verify`.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::common::error::{OracleError, Result};
use crate::domain::TeamSeasonRecord;

pub fn write_csv<P: AsRef<Path>>(records: &[TeamSeasonRecord], path: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!(
        path = %path.as_ref().display(),
        records = records.len(),
        "wrote historical dataset"
    );
    Ok(())
}

pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<TeamSeasonRecord>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: TeamSeasonRecord = result?;
        records.push(record);
    }
    if records.is_empty() {
        return Err(OracleError::Validation(format!(
            "dataset {} contains no records",
            path.as_ref().display()
        )));
    }
    Ok(records)
}

/// Per-season team and playoff counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonBreakdown {
    pub teams: usize,
    pub playoff_teams: usize,
}

#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub total: usize,
    pub playoff_teams: usize,
    pub seasons: BTreeMap<u16, SeasonBreakdown>,
}

impl DatasetSummary {
    pub fn from_records(records: &[TeamSeasonRecord]) -> Self {
        let mut seasons: BTreeMap<u16, SeasonBreakdown> = BTreeMap::new();
        let mut playoff_teams = 0;
        for record in records {
            let entry = seasons.entry(record.season).or_default();
            entry.teams += 1;
            if record.made_playoffs {
                entry.playoff_teams += 1;
                playoff_teams += 1;
            }
        }
        Self {
            total: records.len(),
            playoff_teams,
            seasons,
        }
    }

    pub fn print(&self) {
        println!("Total records: {}", self.total);
        println!("Playoff teams: {}", self.playoff_teams);
        println!("Non-playoff teams: {}", self.total - self.playoff_teams);
        println!("\nSeason breakdown:");
        println!("{:<8} {:>6} {:>14}", "Season", "Teams", "Playoff teams");
        for (season, breakdown) in &self.seasons {
            println!(
                "{:<8} {:>6} {:>14}",
                season, breakdown.teams, breakdown.playoff_teams
            );
        }
    }

    pub fn latest_season(&self) -> Option<u16> {
        self.seasons.keys().next_back().copied()
    }
}
