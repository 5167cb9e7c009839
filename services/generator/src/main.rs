//! Contour map generator CLI.
//!
//! Interpolates scattered scalar samples (or a synthetic field) onto a
//! regular grid, contours it, and streams classified GeoJSON polygons.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use generator::scatter::{self, ScatterArgs};
use generator::synthetic::{self, SyntheticArgs};

#[derive(Parser, Debug)]
#[command(name = "generator")]
#[command(about = "Contour map generator producing classified GeoJSON")]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Contour a synthetic multi-peak field
    Synthetic(SyntheticArgs),
    /// Contour scattered samples from a JSON file
    Scatter(ScatterArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &cli.command {
        Command::Synthetic(args) => synthetic::run(args),
        Command::Scatter(args) => scatter::run(args),
    }
}
