//! `merge`: combine locally downloaded per-season CSV exports into the
//! historical dataset. Playoff membership comes from the eligibility marker
//! the exports carry on team names, so no roster file is needed here.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::common::error::{OracleError, Result};
use crate::dataset::{self, DatasetSummary};
use crate::normalize::normalize;
use crate::sources::file;

pub struct MergeOptions {
    pub dir: PathBuf,
    pub first_season: u16,
    pub last_season: u16,
    /// Export filename pattern; `{season}` is replaced with the ending year.
    pub pattern: String,
    pub out: PathBuf,
}

pub fn run(options: MergeOptions) -> Result<()> {
    if options.first_season > options.last_season {
        return Err(OracleError::Validation(format!(
            "first season {} is after last season {}",
            options.first_season, options.last_season
        )));
    }
    if !options.pattern.contains("{season}") {
        return Err(OracleError::Validation(
            "filename pattern must contain {season}".to_string(),
        ));
    }

    let no_roster = HashSet::new();
    let mut records = Vec::new();
    for season in options.first_season..=options.last_season {
        let filename = options.pattern.replace("{season}", &season.to_string());
        let path = options.dir.join(&filename);
        println!("Processing {} (season {season})...", path.display());
        let season_records = file::read_export(&path)
            .and_then(|rows| normalize(&rows, season, &no_roster));
        match season_records {
            Ok(season_records) => {
                let playoff = season_records.iter().filter(|r| r.made_playoffs).count();
                println!(
                    "  ✓ {} teams ({} playoff, {} non-playoff)",
                    season_records.len(),
                    playoff,
                    season_records.len() - playoff
                );
                records.extend(season_records);
            }
            Err(e) => {
                warn!(season, error = %e, "skipping export");
                println!("  ✗ {season}: {e}");
            }
        }
    }

    if records.is_empty() {
        return Err(OracleError::Validation(
            "no usable records from any export".to_string(),
        ));
    }

    dataset::write_csv(&records, &options.out)?;
    info!(records = records.len(), "merge run complete");

    println!("\n✅ Merged {} team-seasons into {}", records.len(), options.out.display());
    DatasetSummary::from_records(&records).print();
    Ok(())
}
