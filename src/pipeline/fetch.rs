//! `fetch`: scrape a range of seasons from the stats site, normalize each,
//! and write the combined historical dataset.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::common::error::{OracleError, Result};
use crate::config::PlayoffRosters;
use crate::dataset::{self, DatasetSummary};
use crate::normalize::normalize;
use crate::sources::web;

pub struct FetchOptions {
    pub base_url: String,
    pub first_season: u16,
    pub last_season: u16,
    pub rosters: PathBuf,
    pub out: PathBuf,
    /// Fixed inter-request delay toward the stats site.
    pub delay_ms: u64,
}

pub async fn run(options: FetchOptions) -> Result<()> {
    if options.first_season > options.last_season {
        return Err(OracleError::Validation(format!(
            "first season {} is after last season {}",
            options.first_season, options.last_season
        )));
    }

    let rosters = PlayoffRosters::load(&options.rosters)?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let mut records = Vec::new();
    for season in options.first_season..=options.last_season {
        println!("📊 Fetching {}-{} season...", season - 1, season);
        let season_records = match web::fetch_season(&client, &options.base_url, season).await {
            Ok(rows) => normalize(&rows, season, &rosters.teams_for(season)),
            Err(e) => Err(e),
        };
        match season_records {
            Ok(season_records) => {
                println!("   ✅ {} teams", season_records.len());
                records.extend(season_records);
            }
            Err(e) => {
                warn!(season, error = %e, "skipping season");
                println!("   ❌ {season}: {e}");
            }
        }
        if season != options.last_season {
            tokio::time::sleep(Duration::from_millis(options.delay_ms)).await;
        }
    }

    if records.is_empty() {
        return Err(OracleError::Validation(
            "no usable records from any season; check connectivity and the source".to_string(),
        ));
    }

    dataset::write_csv(&records, &options.out)?;
    info!(records = records.len(), "fetch run complete");

    println!("\n💾 Saved {} team-seasons to {}", records.len(), options.out.display());
    DatasetSummary::from_records(&records).print();
    Ok(())
}
