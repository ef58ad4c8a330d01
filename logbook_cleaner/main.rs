use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;

use logbook_cleanup::logbook::{self, CLEANED_LOGBOOK, COMPLETE_LOGBOOK};
use logbook_cleanup::stats::CleanSummary;
use logbook_cleanup::{LogbookCleaner, PageRecord, Settings};

#[derive(Parser)]
#[command(
    name = "logbook_cleaner",
    about = "Clean OCR text and backfill dates and locations in the digitized logbook"
)]
struct Cli {
    /// Input logbook (default: <data dir>/complete_logbook.json)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Output logbook (default: <data dir>/cleaned_logbook.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to read LOGBOOK_* settings")?;
    info!(settings = ?settings, "starting logbook cleaner");

    let data_dir = logbook::data_dir(&settings);
    let input = cli.input.unwrap_or_else(|| data_dir.join(COMPLETE_LOGBOOK));
    let output = cli.output.unwrap_or_else(|| data_dir.join(CLEANED_LOGBOOK));

    println!("Logbook Cleaner");
    println!("===============\n");

    let t0 = Instant::now();
    let book = logbook::load::<PageRecord>(&input)
        .with_context(|| format!("Cannot clean logbook {:?}", input))?;
    println!("Loaded {} entries from {:?}\n", book.entries.len(), input);

    let cleaned = LogbookCleaner::new().clean_logbook(book, Local::now().naive_local());
    logbook::save(&output, &cleaned).with_context(|| format!("Failed to save {:?}", output))?;
    println!("Wrote {} entries to {:?}\n", cleaned.entries.len(), output);

    print!("{}", CleanSummary::from_entries(&cleaned.entries).render());
    println!("\nDone in {:.2}s", t0.elapsed().as_secs_f64());
    Ok(())
}
