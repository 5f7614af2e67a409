//! CLI entry point for pocketstats.
//!
//! Provides subcommands for summarizing cavity-detection spreadsheets per
//! folder, exploring Ramachandran quality scores, and rendering RMSD
//! heatmaps.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use pocketstats::cavity::analyzer::summarize_folder;
use pocketstats::config::{DEFAULT_EXTENSION, DEFAULT_REPORT_NAME, SummaryConfig};
use pocketstats::heatmap::{load_matrix, render_heatmap};
use pocketstats::output::{print_json, scores_table, statistics_table, write_scores_csv};
use pocketstats::quality::filter::{filter_scores, software_statistics};
use pocketstats::quality::loader::load_scores;
use pocketstats::quality::types::{
    Protein, ScoreFilter, ScoreRow, Software, SoftwareStats, Structure,
};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "pocketstats")]
#[command(about = "Cavity, quality-score and RMSD summaries for structural models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize cavity spreadsheets folder by folder
    Summarize {
        /// Folders to scan (defaults to the TopModels folders)
        #[arg(value_name = "FOLDER")]
        folders: Vec<PathBuf>,

        /// Spreadsheet file extension
        #[arg(short, long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Report file created inside each folder
        #[arg(short, long, default_value = DEFAULT_REPORT_NAME)]
        report_name: String,

        /// Also write a JSON summary next to each report
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Filter and rank models by Ramachandran scores
    Scores {
        /// Score table CSV
        #[arg(value_name = "CSV", default_value = "RawData.csv")]
        input: PathBuf,

        /// Structures to keep (MON, DIM)
        #[arg(long, value_enum, value_delimiter = ',')]
        structure: Vec<Structure>,

        /// Software to keep (AF, RF, SM, MD)
        #[arg(long, value_enum, value_delimiter = ',')]
        software: Vec<Software>,

        /// Proteins to keep (NCChumano, NCCAnguila)
        #[arg(long, value_enum, value_delimiter = ',')]
        protein: Vec<Protein>,

        /// Two-digit model numbers to keep
        #[arg(long, value_delimiter = ',')]
        model: Vec<String>,

        /// Apply the --relaxation levels
        #[arg(long, default_value_t = false)]
        relaxed: bool,

        /// Relaxation levels to keep (Base, Relaxed1, ...)
        #[arg(long, value_delimiter = ',')]
        relaxation: Vec<String>,

        /// Show every matching model instead of the ranking
        #[arg(long, default_value_t = false)]
        all_models: bool,

        /// Ranked models kept per software
        #[arg(short = 'p', long, default_value_t = 5)]
        models_per_software: usize,

        /// Maximum ranked models shown
        #[arg(short = 'n', long, default_value_t = 10)]
        top_n: usize,

        /// Print JSON instead of tables
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Write the selected rows to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render an RMSD matrix CSV as an annotated SVG heatmap
    Heatmap {
        /// Labelled square matrix CSV
        #[arg(value_name = "MATRIX")]
        input: PathBuf,

        /// SVG file to write (.png is rewritten to .svg)
        #[arg(short, long, default_value = "heatmap.svg")]
        output: PathBuf,

        /// Figure title
        #[arg(short, long, default_value = "RMSD heatmap")]
        title: String,
    },
}

#[derive(Serialize)]
struct ScoresReport<'a> {
    generated_at: chrono::DateTime<chrono::Utc>,
    filter: &'a ScoreFilter,
    rows: Vec<&'a ScoreRow>,
    statistics: Vec<SoftwareStats>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/pocketstats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("pocketstats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            folders,
            extension,
            report_name,
            json,
        } => {
            let config = SummaryConfig::new(folders, &extension, &report_name, json);
            summarize(&config)?;
        }
        Commands::Scores {
            input,
            structure,
            software,
            protein,
            model,
            relaxed,
            relaxation,
            all_models,
            models_per_software,
            top_n,
            json,
            output,
        } => {
            let filter = ScoreFilter {
                structures: structure,
                software,
                proteins: protein,
                models: model,
                relaxed,
                relaxation_levels: relaxation,
                all_models,
                models_per_software,
                top_n,
            };
            scores(&input, &filter, json, output.as_deref())?;
        }
        Commands::Heatmap {
            input,
            output,
            title,
        } => {
            let matrix = load_matrix(&input)?;
            let written = render_heatmap(&output, &matrix, &title)?;
            println!("Heatmap written to: {}", written.display());
        }
    }

    Ok(())
}

/// Summarizes each configured folder in turn. A failing folder is logged and
/// the remaining folders still run.
fn summarize(config: &SummaryConfig) -> Result<()> {
    let mut failed = 0usize;

    for folder in &config.folders {
        match summarize_folder(folder, config) {
            Ok(report) => {
                println!("Summary file written to: {}\n", report.report_path.display());
            }
            Err(e) => {
                error!(folder = %folder.display(), error = %format!("{e:#}"), "Folder failed");
                failed += 1;
            }
        }
    }

    info!(
        folders = config.folders.len(),
        failed, "Finished summarizing folders"
    );
    if failed > 0 {
        bail!("{failed} of {} folders failed", config.folders.len());
    }
    Ok(())
}

fn scores(input: &Path, filter: &ScoreFilter, json: bool, output: Option<&Path>) -> Result<()> {
    let rows = load_scores(input)?;
    let selected = filter_scores(&rows, filter);
    let statistics = software_statistics(&selected);
    info!(total = rows.len(), selected = selected.len(), "Scores filtered");

    if let Some(path) = output {
        write_scores_csv(path, &selected)?;
        info!(path = %path.display(), "Selected rows exported");
    }

    if json {
        print_json(&ScoresReport {
            generated_at: chrono::Utc::now(),
            filter,
            rows: selected,
            statistics,
        })?;
    } else {
        println!("{}", scores_table(&selected));
        println!("\nFavored mean and standard deviation per software:");
        println!("{}", statistics_table(&statistics));
    }

    Ok(())
}
