//! `verify`: load the historical dataset back from disk and print its
//! summary, including the playoff field of the latest season.

use std::path::PathBuf;

use crate::common::error::Result;
use crate::dataset::{self, DatasetSummary};

pub struct VerifyOptions {
    pub data: PathBuf,
}

pub fn run(options: VerifyOptions) -> Result<()> {
    let records = dataset::read_csv(&options.data)?;
    let summary = DatasetSummary::from_records(&records);

    println!("✅ Loaded {}", options.data.display());
    summary.print();

    if let Some(season) = summary.latest_season() {
        let mut playoff_teams: Vec<_> = records
            .iter()
            .filter(|r| r.season == season && r.made_playoffs)
            .collect();
        playoff_teams.sort_by(|a, b| b.wins.cmp(&a.wins));

        println!("\n🏀 {season} playoff teams:");
        println!("{:<28} {:>4} {:>4} {:>8}", "Team", "W", "L", "WinPct");
        for record in playoff_teams {
            println!(
                "{:<28} {:>4} {:>4} {:>8}",
                record.team,
                record.wins,
                record.losses,
                record
                    .win_pct
                    .map(|p| format!("{p:.3}"))
                    .unwrap_or_else(|| "-".to_string()),
            );
        }
    }
    Ok(())
}
