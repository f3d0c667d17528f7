//! kox-lister CLI - list a kox.moe book and its volumes.

use anyhow::{Context, Result};
use clap::Parser;
use kox_lister::config::Config;
use kox_lister::console::Console;
use kox_lister::{ReqwestSession, VolumeType, extract_book_info_and_volumes_with};
use serde_json::json;
use std::path::PathBuf;

/// List the volumes of a kox.moe book.
#[derive(Parser, Debug)]
#[command(name = "kox-lister")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL of the book landing page.
    book_url: String,

    /// Use this config file instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip malformed volume lines instead of failing.
    #[arg(long)]
    lenient: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let console = Console::new();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    config.output.lenient |= args.lenient;
    config.output.json |= args.json;
    config.validate().context("Invalid configuration")?;

    let session = ReqwestSession::from_config(&config).context("Failed to create HTTP session")?;
    let options = config.extract_options();

    if !config.output.json {
        console.step(&format!("Fetching {}", args.book_url));
    }

    let result = extract_book_info_and_volumes_with(&session, &args.book_url, &options).await;
    let (book, volumes) = match result {
        Ok(extracted) => extracted,
        Err(e) => {
            console.error(&e.to_string());
            return Err(e).context("Failed to extract book");
        }
    };

    if config.output.json {
        let output = json!({ "book": book, "volumes": volumes });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    console.success(&console.book_header(&book));
    console.info(&format!("Found {} volumes", volumes.len()));
    if volumes.is_empty() {
        console.warning("The data feed listed no volumes (a login cookie may be required)");
        return Ok(());
    }

    for vol_type in [VolumeType::Volume, VolumeType::Extra, VolumeType::Serialized] {
        let rows: Vec<_> = volumes.iter().filter(|v| v.vol_type == vol_type).collect();
        if rows.is_empty() {
            continue;
        }

        console.section(&format!("{} ({})", vol_type.label(), rows.len()));
        for vol in rows {
            println!("{}", console.volume_row(vol));
        }
    }

    Ok(())
}
