mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "panelscan",
    version,
    about = "Panel-schedule extraction and normalization for construction drawings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract panel schedules from a page-words JSON fixture
    Extract {
        /// Path to a word fixture (one page object or an array of pages)
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write extracted panels to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Override the row-grouping y tolerance (points)
        #[arg(long, value_name = "PTS")]
        y_tol: Option<f64>,

        /// Inner margin removed from each panel region (points)
        #[arg(long, value_name = "PTS")]
        pad: Option<f64>,

        /// Hard cap on per-panel retries
        #[arg(long, value_name = "N")]
        max_retries: Option<u32>,
    },
    /// Canonicalize a persisted panel-schedule document
    Normalize {
        /// Path to a JSON document in any of the accepted shapes
        input_file: PathBuf,

        /// Write the canonical document to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input_file,
            output,
            out,
            y_tol,
            pad,
            max_retries,
        } => commands::extract::run(input_file, &output, out, y_tol, pad, max_retries),
        Commands::Normalize { input_file, out } => commands::normalize::run(input_file, out),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
