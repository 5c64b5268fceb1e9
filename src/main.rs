use std::path::PathBuf;

use clap::{Parser, Subcommand};

use postseason_oracle::observability::logging::init_logging;
use postseason_oracle::pipeline::{fetch, merge, predict, verify};

#[derive(Parser)]
#[command(name = "postseason-oracle")]
#[command(about = "NBA team-stats scraper, dataset builder, and playoff predictor")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape seasons from the stats site and build the historical dataset
    Fetch {
        /// Stats site base URL
        #[arg(long, default_value = "https://www.basketball-reference.com")]
        base_url: String,
        /// First season to fetch (ending year)
        #[arg(long, default_value_t = 2021)]
        first_season: u16,
        /// Last season to fetch (ending year)
        #[arg(long, default_value_t = 2025)]
        last_season: u16,
        /// Playoff rosters JSON (season -> team list)
        #[arg(long, default_value = "config/playoff_teams.json")]
        rosters: PathBuf,
        /// Output dataset path
        #[arg(long, default_value = "nba_historical_data.csv")]
        out: PathBuf,
        /// Fixed delay between season requests, in milliseconds
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
    },
    /// Merge downloaded per-season CSV exports into the historical dataset
    Merge {
        /// Directory holding the exports
        #[arg(long)]
        dir: PathBuf,
        /// First season to merge (ending year)
        #[arg(long, default_value_t = 2021)]
        first_season: u16,
        /// Last season to merge (ending year)
        #[arg(long, default_value_t = 2025)]
        last_season: u16,
        /// Export filename pattern; {season} is replaced per season
        #[arg(long, default_value = "nba_{season}_advanced.csv")]
        pattern: String,
        /// Output dataset path
        #[arg(long, default_value = "nba_historical_data.csv")]
        out: PathBuf,
    },
    /// Score projected season stats against the inference endpoint
    Predict {
        /// Projection set JSON (teams + model metadata)
        #[arg(long, default_value = "config/projections_2026.json")]
        projections: PathBuf,
        /// Endpoint credentials TOML; ORACLE_ENDPOINT_URL / ORACLE_API_KEY
        /// are read from the environment when omitted
        #[arg(long)]
        endpoint_config: Option<PathBuf>,
        /// Output report path
        #[arg(long, default_value = "predictions.json")]
        out: PathBuf,
    },
    /// Summarize an existing historical dataset
    Verify {
        /// Dataset path
        #[arg(long, default_value = "nba_historical_data.csv")]
        data: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    init_logging();

    match cli.command {
        Commands::Fetch {
            base_url,
            first_season,
            last_season,
            rosters,
            out,
            delay_ms,
        } => {
            fetch::run(fetch::FetchOptions {
                base_url,
                first_season,
                last_season,
                rosters,
                out,
                delay_ms,
            })
            .await?;
        }
        Commands::Merge {
            dir,
            first_season,
            last_season,
            pattern,
            out,
        } => {
            merge::run(merge::MergeOptions {
                dir,
                first_season,
                last_season,
                pattern,
                out,
            })?;
        }
        Commands::Predict {
            projections,
            endpoint_config,
            out,
        } => {
            predict::run(predict::PredictOptions {
                projections,
                endpoint_config,
                out,
            })
            .await?;
        }
        Commands::Verify { data } => {
            verify::run(verify::VerifyOptions { data })?;
        }
    }

    Ok(())
}
