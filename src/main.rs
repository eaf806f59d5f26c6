use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use bio_enrich::app::{consolidate, split_education_table};
use bio_enrich::config::Config;
use bio_enrich::observability;
use bio_enrich::pipeline::{today_stamp, Pipeline};
use bio_enrich::seed::ranking_to_table;
use bio_enrich::table::Table;

#[derive(Parser)]
#[command(name = "bio_enrich")]
#[command(about = "Enrich a billionaire list with birth dates and education")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the base list from a saved ranking JSON response
    Seed {
        #[arg(long)]
        ranking: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Resolve every base entity and extract its birth date
    Birth {
        #[arg(long)]
        base: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Only process the first N entities
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Resolve every base entity and scrape its raw education text
    Education {
        #[arg(long)]
        base: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Split raw education text into university/degree columns
    SplitEducation {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Left-join the base list with birth and split education tables
    Merge {
        #[arg(long)]
        base: PathBuf,
        #[arg(long)]
        birth: PathBuf,
        #[arg(long)]
        education: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Birth + education + split + merge into the output directory
    Run {
        #[arg(long)]
        base: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
        /// Overrides the configured output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn load_base(path: &Path, limit: Option<usize>) -> anyhow::Result<Table> {
    let mut base = Table::read_csv_path(path)
        .with_context(|| format!("loading base list {}", path.display()))?;
    if let Some(n) = limit {
        base.truncate(n);
    }
    info!("Loaded {} base rows from {}", base.len(), path.display());
    Ok(base)
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Seed { ranking, out } => {
            let content = std::fs::read_to_string(&ranking)
                .with_context(|| format!("reading {}", ranking.display()))?;
            let data: serde_json::Value = serde_json::from_str(&content)?;
            let table = ranking_to_table(&data)?;
            table.write_csv_path(&out)?;
            println!("Saved base list ({} rows) to {}", table.len(), out.display());
        }
        Commands::Birth { base, out, limit } => {
            let base = load_base(&base, limit)?;
            let pipeline = Pipeline::from_config(&config)?;
            let birth = pipeline.run_birth(&base, &out).await?;
            println!("Saved {} birth rows to {}", birth.len(), out.display());
        }
        Commands::Education { base, out, limit } => {
            let base = load_base(&base, limit)?;
            let pipeline = Pipeline::from_config(&config)?;
            let education = pipeline.run_education(&base, &out).await?;
            println!("Saved {} education rows to {}", education.len(), out.display());
        }
        Commands::SplitEducation { input, out } => {
            let table = Table::read_csv_path(&input)?;
            let split = split_education_table(&table)?;
            split.write_csv_path(&out)?;
            println!("Saved split education ({} rows) to {}", split.len(), out.display());
        }
        Commands::Merge {
            base,
            birth,
            education,
            out,
        } => {
            let base = load_base(&base, None)?;
            let birth = Table::read_csv_path(&birth)?;
            let education = Table::read_csv_path(&education)?;
            let merged = consolidate(&base, &birth, &education)?;
            merged.write_csv_path(&out)?;
            println!("Merged rows: {}", merged.len());
            println!("Saved: {}", out.display());
        }
        Commands::Run {
            base,
            limit,
            output_dir,
        } => {
            let base = load_base(&base, limit)?;
            let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.output.dir));
            let pipeline = Pipeline::from_config(&config)?;
            let result = pipeline.run(&base, &output_dir, &today_stamp()).await?;
            println!("\nPipeline results:");
            println!("   Entities: {}", result.base_rows);
            println!("   Birth dates found: {}", result.birth_dates_found);
            println!("   Education found: {}", result.education_found);
            println!("   Output file: {}", result.merged_file.display());
            info!("Pipeline result: {}", serde_json::to_string(&result)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configuration errors abort before logging or any remote call.
    let config = Config::load(cli.config.as_deref())?;

    let _guard = bio_enrich::logging::init_logging(&config.output.log_dir)?;
    observability::init();

    let outcome = run(cli, config).await;

    if let Some(snapshot) = observability::render() {
        info!("Metrics snapshot:\n{}", snapshot);
    }
    if let Err(e) = &outcome {
        error!("Run failed: {:#}", e);
    }
    outcome
}
