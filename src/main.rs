//! vesseldb CLI
//!
//! Loads a JSON record file, prints index statistics, then answers queries
//! read from stdin until `exit`.

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vesseldb::core::config::Config;
use vesseldb::core::database::Database;

#[derive(Debug, Parser)]
#[command(name = "vesseldb", version, about = "In-memory indexed record database")]
struct Args {
    /// JSON file holding a top-level array of records
    #[arg(long)]
    data: PathBuf,

    /// Settings document with a `Database.IndexFieldVsType` section
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    chunk_size: Option<usize>,

    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "vesseldb=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    tracing::info!("vesseldb v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.settings {
        Some(path) => Config::from_settings_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Config::default(),
    }
    .with_env_overrides();
    if let Some(size) = args.chunk_size {
        config = config.chunk_size(size);
    }
    if let Some(threads) = args.threads {
        config = config.worker_threads(threads);
    }

    let preview_limit = config.preview_limit;
    let top_values = config.top_values;

    let mut db = Database::open(config).context("opening database")?;
    db.load_json_file(&args.data)
        .with_context(|| format!("loading records from {}", args.data.display()))?;

    let stats = db.stats();
    println!(
        "Loaded {} records in {} ms ({} chunks)",
        stats.total_records, stats.load_time_ms, stats.chunk_count
    );
    print!("{}", db.index_stats(top_values));

    repl(&db, preview_limit)?;

    let stats = db.stats();
    tracing::info!(
        queries = stats.queries_executed,
        cache_hit_rate = stats.cache_stats.hit_rate(),
        "shutting down"
    );
    Ok(())
}

fn repl(db: &Database, preview_limit: usize) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "\nEnter query (or 'exit'): ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            break;
        }

        let results = db.query(input);
        write!(stdout, "{}", results.preview(preview_limit))?;
        writeln!(stdout, "Query took {} ms", results.took_ms)?;
    }
    Ok(())
}
