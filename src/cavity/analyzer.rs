use crate::cavity::leaderboard::{build_leaderboard, render_section};
use crate::cavity::loader::{SkipReason, load_records};
use crate::cavity::metrics::{compute_metrics, summary_line};
use crate::cavity::scanner::scan_folder;
use crate::cavity::types::{FileMetrics, FolderSummary};
use crate::config::SummaryConfig;
use crate::output::write_json;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of summarizing one folder.
#[derive(Debug)]
pub struct FolderReport {
    pub report_path: PathBuf,
    pub files: Vec<FileMetrics>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Writes every line to the report file and to a second sink (stdout in
/// the CLI), so both carry identical text.
struct Tee<A: Write, B: Write> {
    report: A,
    echo: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.report.write_all(text.as_bytes())?;
        self.echo.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.report.flush()?;
        self.echo.flush()
    }
}

/// Loads, filters and reduces one spreadsheet.
#[tracing::instrument(skip_all, fields(file = %path.display()))]
pub fn analyze_file(path: &Path) -> Result<FileMetrics, SkipReason> {
    let name = file_name(path);
    let rows = load_records(path)?;
    compute_metrics(&name, &rows)
}

/// Human note written for a skipped file.
pub fn skip_note(name: &str, reason: &SkipReason) -> String {
    match reason {
        SkipReason::MissingColumns(_) => format!("Skipped (missing columns): {name}"),
        SkipReason::NoValidRows => format!("No valid data after filtering: {name}"),
        SkipReason::Unreadable(_) => format!("Skipped (unreadable file): {name}"),
    }
}

/// Summarizes `folder`, echoing the report to stdout.
pub fn summarize_folder(folder: &Path, config: &SummaryConfig) -> Result<FolderReport> {
    summarize_folder_to(folder, config, io::stdout().lock())
}

/// Summarizes `folder`, writing the report file and mirroring it to `echo`.
///
/// File-level problems become skip notes. Listing the folder or creating the
/// report are the only errors returned.
#[tracing::instrument(skip_all, fields(folder = %folder.display()))]
pub fn summarize_folder_to<W: Write>(
    folder: &Path,
    config: &SummaryConfig,
    echo: W,
) -> Result<FolderReport> {
    let files = scan_folder(folder, &config.extension, &config.report_name)?;
    info!(count = files.len(), "Spreadsheets found");

    let report_path = folder.join(&config.report_name);
    let report_file = File::create(&report_path)
        .with_context(|| format!("cannot create report {}", report_path.display()))?;
    let mut out = Tee {
        report: BufWriter::new(report_file),
        echo,
    };

    let mut results = Vec::new();
    let mut skipped = Vec::new();

    for path in &files {
        let name = file_name(path);
        match analyze_file(path) {
            Ok(metrics) => {
                out.emit(&format!("{}\n", summary_line(&metrics)))?;
                results.push(metrics);
            }
            Err(reason) => {
                warn!(file = %name, reason = %reason, "File skipped");
                out.emit(&format!("{}\n", skip_note(&name, &reason)))?;
                skipped.push((name, reason));
            }
        }
    }

    out.emit(&render_section(&results))?;
    out.flush()?;

    if config.json {
        let json_path = report_path.with_extension("json");
        let summary = FolderSummary {
            generated_at: chrono::Utc::now(),
            folder: folder.display().to_string(),
            files: results.clone(),
            leaderboard: build_leaderboard(&results),
        };
        write_json(&json_path, &summary)?;
        info!(path = %json_path.display(), "JSON summary written");
    }

    info!(
        valid = results.len(),
        skipped = skipped.len(),
        report = %report_path.display(),
        "Folder summarized"
    );

    Ok(FolderReport {
        report_path,
        files: results,
        skipped,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
