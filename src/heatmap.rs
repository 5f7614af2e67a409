//! RMSD heatmaps rendered as SVG.
//!
//! The matrix CSV carries labels in its header row (first cell ignored) and
//! one row per model whose first cell repeats the label:
//!
//! ```text
//! ,AF,RF,SM
//! AF,0.000,1.182,1.029
//! RF,1.182,0.000,0.877
//! SM,1.029,0.877,0.000
//! ```

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("matrix has no entries")]
    Empty,

    #[error("expected {expected} rows to match the header, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row} has {found} values, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row} is labelled '{found}', header says '{expected}'")]
    LabelMismatch {
        row: usize,
        expected: String,
        found: String,
    },

    #[error("value at ({row}, {col}) is not a finite non-negative number: '{raw}'")]
    InvalidValue { row: usize, col: usize, raw: String },
}

/// Square, labelled RMSD matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct RmsdMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl RmsdMatrix {
    pub fn new(labels: Vec<String>, values: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        if labels.is_empty() {
            return Err(MatrixError::Empty);
        }
        if values.len() != labels.len() {
            return Err(MatrixError::RowCount {
                expected: labels.len(),
                found: values.len(),
            });
        }
        for (row, line) in values.iter().enumerate() {
            if line.len() != labels.len() {
                return Err(MatrixError::RowLength {
                    row,
                    expected: labels.len(),
                    found: line.len(),
                });
            }
            if let Some(col) = line.iter().position(|v| !v.is_finite() || *v < 0.0) {
                return Err(MatrixError::InvalidValue {
                    row,
                    col,
                    raw: line[col].to_string(),
                });
            }
        }
        Ok(Self { labels, values })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    /// Smallest and largest entry.
    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            })
    }
}

/// Reads a labelled matrix CSV.
pub fn load_matrix(path: &Path) -> Result<RmsdMatrix> {
    let file = File::open(path).with_context(|| format!("cannot open matrix {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let labels: Vec<String> = rdr
        .headers()?
        .iter()
        .skip(1)
        .map(|h| h.trim().to_string())
        .collect();

    let mut values = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let label = record.get(0).unwrap_or("").trim();
        if let Some(expected) = labels.get(row) {
            if expected != label {
                return Err(MatrixError::LabelMismatch {
                    row,
                    expected: expected.clone(),
                    found: label.to_string(),
                }
                .into());
            }
        }

        let mut line = Vec::new();
        for (col, raw) in record.iter().skip(1).enumerate() {
            let raw = raw.trim();
            let v: f64 = raw.parse().map_err(|_| MatrixError::InvalidValue {
                row,
                col,
                raw: raw.to_string(),
            })?;
            line.push(v);
        }
        values.push(line);
    }

    Ok(RmsdMatrix::new(labels, values)?)
}

/// Maps `value` in `[lo, hi]` onto a blue → white → red scale.
fn heatmap_color(value: f64, lo: f64, hi: f64) -> RGBColor {
    let v = if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    if v < 0.5 {
        let t = v * 2.0;
        RGBColor((59.0 + 196.0 * t) as u8, (76.0 + 179.0 * t) as u8, (192.0 + 63.0 * t) as u8)
    } else {
        let t = (v - 0.5) * 2.0;
        RGBColor(
            (255.0 - 75.0 * t) as u8,
            (255.0 - 251.0 * t) as u8,
            (255.0 - 217.0 * t) as u8,
        )
    }
}

/// Renders `matrix` with every cell annotated to two decimals.
///
/// A `.png` path is written as `.svg` next to it; the path actually
/// written is returned.
pub fn render_heatmap(path: &Path, matrix: &RmsdMatrix, title: &str) -> Result<PathBuf> {
    let svg_path = if path.extension().is_some_and(|e| e == "png") {
        path.with_extension("svg")
    } else {
        path.to_path_buf()
    };

    let n = matrix.size();
    let labels = matrix.labels();
    let (lo, hi) = matrix.range();

    // the backend borrows `svg_path` until it is dropped
    {
        let root = SVGBackend::new(&svg_path, (720, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(80)
            .y_label_area_size(120)
            .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())?;

        // row 0 is drawn at the top
        let label_at = |v: &SegmentValue<usize>, flip: bool| match v {
            SegmentValue::CenterOf(i) if *i < n => {
                let idx = if flip { n - 1 - *i } else { *i };
                labels[idx].clone()
            }
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&|x| label_at(x, false))
            .y_label_formatter(&|y| label_at(y, true))
            .x_desc("Model")
            .y_desc("Model")
            .draw()?;

        let cells = (0..n).flat_map(|row| (0..n).map(move |col| (row, col)));

        chart.draw_series(cells.clone().map(|(row, col)| {
            let y = n - 1 - row;
            Rectangle::new(
                [
                    (SegmentValue::Exact(col), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(col + 1), SegmentValue::Exact(y + 1)),
                ],
                heatmap_color(matrix.get(row, col), lo, hi).filled(),
            )
        }))?;

        let text_style = ("sans-serif", 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_series(cells.map(|(row, col)| {
            Text::new(
                format!("{:.2}", matrix.get(row, col)),
                (SegmentValue::CenterOf(col), SegmentValue::CenterOf(n - 1 - row)),
                text_style.clone(),
            )
        }))?;

        root.present()?;
    }
    info!(path = %svg_path.display(), size = n, "Heatmap written");
    Ok(svg_path)
}
