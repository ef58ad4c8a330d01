use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;

use logbook_cleanup::logbook::{self, CLEANED_LOGBOOK, COMBINED_LOGBOOK};
use logbook_cleanup::stats::CombineSummary;
use logbook_cleanup::{DocumentCombiner, PageRecord, Settings};

#[derive(Parser)]
#[command(
    name = "document_combiner",
    about = "Merge consecutive logbook pages into letters, telegrams, reports and lists"
)]
struct Cli {
    /// Input logbook (default: <data dir>/cleaned_logbook.json)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Output logbook (default: <data dir>/combined_logbook.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Emit short pages no document absorbed as single-page documents
    #[arg(long)]
    keep_short_fragments: bool,
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
    info!(settings = ?settings, "starting document combiner");

    let data_dir = logbook::data_dir(&settings);
    let input = cli.input.unwrap_or_else(|| data_dir.join(CLEANED_LOGBOOK));
    let output = cli.output.unwrap_or_else(|| data_dir.join(COMBINED_LOGBOOK));

    let mut combiner = DocumentCombiner::from_settings(&settings);
    combiner.keep_short_fragments |= cli.keep_short_fragments;

    println!("Document Combiner");
    println!("=================\n");

    let t0 = Instant::now();
    let book = logbook::load::<PageRecord>(&input)
        .with_context(|| format!("Cannot combine logbook {:?}", input))?;
    println!("Loaded {} entries from {:?}\n", book.entries.len(), input);

    let combined = combiner.process_logbook(book, Local::now().naive_local());
    logbook::save(&output, &combined).with_context(|| format!("Failed to save {:?}", output))?;
    println!("Wrote {} documents to {:?}\n", combined.entries.len(), output);

    print!("{}", CombineSummary::from_logbook(&combined).render());
    println!("\nDone in {:.2}s", t0.elapsed().as_secs_f64());
    Ok(())
}
