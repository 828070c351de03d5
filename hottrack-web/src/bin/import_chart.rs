//! import-chart - load a Melon chart JSON dump into the hottrack database
//!
//! The source is a local file or an http(s) URL. Rows whose `melon_uid` is
//! already stored are skipped; invalid rows are logged and skipped.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use hottrack_common::config::TomlConfig;
use hottrack_common::import::parse_chart_json;
use hottrack_common::Song;
use hottrack_web::db::{self, songs};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/pyhub-kr/dump-data/main/melon/melon-20230910.json";

#[derive(Parser, Debug)]
#[command(name = "import-chart")]
#[command(about = "Import a Melon chart JSON dump into the hottrack database")]
#[command(version)]
struct Args {
    /// JSON file path or http(s) URL
    #[arg(default_value = DEFAULT_SOURCE)]
    source: String,

    /// TOML configuration file (defaults to the OS config directory)
    #[arg(short, long, env = "HOTTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database path (overrides config)
    #[arg(short, long, env = "HOTTRACK_DATABASE")]
    database: Option<PathBuf>,

    /// Download timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,
}

#[derive(Debug, Default)]
struct ImportSummary {
    inserted: usize,
    skipped: usize,
    invalid: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "import_chart=info,hottrack_common=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = TomlConfig::load_or_default(args.config.as_deref())?;
    if let Some(database) = args.database {
        config.database_path = database;
    }

    let bytes = read_source(&args.source, Duration::from_secs(args.timeout_secs)).await?;
    let records = parse_chart_json(&bytes).context("Chart source is not a JSON array of rows")?;
    info!("Read {} chart rows from {}", records.len(), args.source);

    let pool = db::init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    let mut summary = ImportSummary::default();
    for (index, record) in records.iter().enumerate() {
        let song = match Song::from_external_record(record) {
            Ok(song) => song,
            Err(e) => {
                warn!("Row {}: {}", index, e);
                summary.invalid += 1;
                continue;
            }
        };

        if songs::insert_if_absent(&pool, &song).await? {
            summary.inserted += 1;
        } else {
            summary.skipped += 1;
        }
    }

    info!(
        "Import into {} complete: {} inserted, {} already present, {} invalid",
        config.database_path.display(),
        summary.inserted,
        summary.skipped,
        summary.invalid
    );
    Ok(())
}

async fn read_source(source: &str, timeout: Duration) -> Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let response = client
            .get(source)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Download {} failed", source))?;
        Ok(response.bytes().await?.to_vec())
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Read {} failed", source))
    }
}
