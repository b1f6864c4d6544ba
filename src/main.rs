use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod ingest;
mod models;
mod rank;
mod report;

#[derive(Parser)]
#[command(name = "cloud-skills-leaderboard")]
#[command(about = "Builds the cloud-skills leaderboard JSON from a spreadsheet export", long_about = None)]
struct Cli {
    /// Participant CSV export to read
    #[arg(default_value = "public/data.csv")]
    input: PathBuf,
    /// Leaderboard document to write
    #[arg(default_value = "public/leaderboard-data.json")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let rows = ingest::read_rows(&cli.input)?;
    info!(rows = rows.len(), source = %cli.input.display(), "export loaded");

    let mut participants: Vec<_> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| ingest::parse_participant(index, row))
        .collect();

    let analytics = report::summarize(&participants);
    rank::sort_participants(&mut participants);

    let document = report::assemble(Utc::now(), analytics, participants);
    report::write_document(&cli.output, &document)?;

    println!("Leaderboard generated from {}.", cli.input.display());
    println!("Total participants: {}", analytics.total_participants);
    println!("Completed all badges: {}", analytics.completed_all_badges);
    println!("Completed an arcade game: {}", analytics.completed_arcade_game);
    println!("Eligible for swag: {}", analytics.eligible_for_swag);
    println!("Credits redeemed: {}", analytics.credits_redeemed);
    println!("Written to {}.", cli.output.display());

    Ok(())
}
