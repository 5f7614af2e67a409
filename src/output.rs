//! Output formatting and persistence.
//!
//! Renders plain-text tables, writes pretty JSON and exports filtered rows
//! as CSV.

use anyhow::{Context, Result};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::cavity::types::FileMetrics;
use crate::quality::types::{ScoreRow, SoftwareStats};

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(header.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());

    for i in 1..header.len() {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

/// Fixed-column per-file metrics table of a folder report.
pub fn metrics_table(files: &[FileMetrics]) -> String {
    let mut table = new_table(&[
        "file",
        "promedio_druggability",
        "conteo_strong",
        "max_drugscore",
        "avg_drugscore",
        "max_surface_area",
    ]);

    for m in files {
        table.add_row(vec![
            Cell::new(&m.file),
            Cell::new(fmt_opt(m.promedio_druggability, 6)),
            Cell::new(m.conteo_strong),
            Cell::new(m.max_drugscore),
            Cell::new(format!("{:.6}", m.avg_drugscore)),
            Cell::new(fmt_opt(m.max_surface_area, 2)),
        ]);
    }

    table.to_string()
}

/// Ranked score rows as shown by the `scores` command.
pub fn scores_table(rows: &[&ScoreRow]) -> String {
    let mut table = new_table(&[
        "FileName",
        "Structure",
        "Software",
        "Protein",
        "Model",
        "Relaxation",
        "Favored",
        "Outliers",
        "Z-Score",
    ]);

    let tag = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    for r in rows {
        table.add_row(vec![
            Cell::new(&r.file_name),
            Cell::new(tag(r.structure.map(|s| s.to_string()))),
            Cell::new(tag(r.software.map(|s| s.to_string()))),
            Cell::new(tag(r.protein.map(|p| p.to_string()))),
            Cell::new(tag(r.model_base.clone())),
            Cell::new(&r.relaxation),
            Cell::new(fmt_opt(r.favored, 2)),
            Cell::new(fmt_opt(r.outliers, 2)),
            Cell::new(fmt_opt(r.z_score, 2)),
        ]);
    }

    table.to_string()
}

pub fn statistics_table(stats: &[SoftwareStats]) -> String {
    let mut table = new_table(&["Software", "n", "mean", "std"]);
    for s in stats {
        table.add_row(vec![
            Cell::new(s.software),
            Cell::new(s.count),
            Cell::new(fmt_opt(s.mean, 3)),
            Cell::new(fmt_opt(s.std, 3)),
        ]);
    }
    table.to_string()
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty JSON to `path`, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

/// Flat CSV shape of a [`ScoreRow`].
#[derive(Serialize)]
struct ScoreExport<'a> {
    #[serde(rename = "FileName")]
    file_name: &'a str,
    #[serde(rename = "Structure")]
    structure: Option<String>,
    #[serde(rename = "Software")]
    software: Option<String>,
    #[serde(rename = "Protein")]
    protein: Option<String>,
    #[serde(rename = "ModelBase")]
    model_base: Option<&'a str>,
    #[serde(rename = "Relaxed")]
    relaxation: &'a str,
    #[serde(rename = "Ramachandran Favored (>98%)")]
    favored: Option<f64>,
    #[serde(rename = "Ramachandran Outliers (<0.05%)")]
    outliers: Option<f64>,
    #[serde(rename = "Ramachandran Z-Score (abs(ZScore)<2)")]
    z_score: Option<f64>,
}

/// Writes the selected score rows to a CSV file with a header line.
pub fn write_scores_csv(path: &Path, rows: &[&ScoreRow]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV export");
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;

    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);
    for r in rows {
        writer.serialize(ScoreExport {
            file_name: &r.file_name,
            structure: r.structure.map(|s| s.to_string()),
            software: r.software.map(|s| s.to_string()),
            protein: r.protein.map(|p| p.to_string()),
            model_base: r.model_base.as_deref(),
            relaxation: &r.relaxation,
            favored: r.favored,
            outliers: r.outliers,
            z_score: r.z_score,
        })?;
    }
    writer.flush()?;

    Ok(())
}
