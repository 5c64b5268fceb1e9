//! `predict`: score the configured projected season statistics against the
//! deployed inference endpoint and write the prediction report.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::common::error::Result;
use crate::config::{EndpointConfig, ProjectionSet};
use crate::domain::Conference;
use crate::endpoint::InferenceClient;
use crate::predict::assemble_report;

pub struct PredictOptions {
    pub projections: PathBuf,
    /// Optional TOML file with endpoint credentials; the environment is used
    /// when absent.
    pub endpoint_config: Option<PathBuf>,
    pub out: PathBuf,
}

pub async fn run(options: PredictOptions) -> Result<()> {
    let endpoint = match &options.endpoint_config {
        Some(path) => EndpointConfig::load(path)?,
        None => EndpointConfig::from_env()?,
    };
    let projections = ProjectionSet::load(&options.projections)?;

    println!(
        "🏀 Scoring {} projected teams for season {}...",
        projections.teams.len(),
        projections.season
    );

    let client = InferenceClient::new(endpoint);
    let values = client.predict(&projections.teams).await?;
    let report = assemble_report(&projections.teams, &values, &projections.model)?;

    fs::write(&options.out, serde_json::to_string_pretty(&report)?)?;
    info!(
        predictions = report.predictions.len(),
        out = %options.out.display(),
        "prediction run complete"
    );

    for conference in [Conference::Eastern, Conference::Western] {
        let qualified: Vec<&str> = report
            .predictions
            .iter()
            .filter(|p| p.conference == conference && p.will_make_playoffs)
            .map(|p| p.team.as_str())
            .collect();
        println!(
            "📊 {conference} Conference: {} teams predicted to make the playoffs",
            qualified.len()
        );
        let top: Vec<&str> = report
            .predictions
            .iter()
            .filter(|p| p.conference == conference)
            .take(3)
            .map(|p| p.team.as_str())
            .collect();
        println!("🏆 Top 3 {conference}: {}", top.join(", "));
    }
    println!("\n💾 Saved to {}", options.out.display());
    Ok(())
}
