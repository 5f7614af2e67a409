//! Spreadsheet loading and column validation.

use crate::cavity::types::{
    COL_DRUGGABILITY, COL_DRUGSCORE, COL_INDEX, COL_SURFACE_AREA, CavityRecord, Druggability,
    REQUIRED_COLUMNS,
};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Why a file contributed no metrics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no valid data after filtering")]
    NoValidRows,

    #[error("unreadable: {0}")]
    Unreadable(String),
}

/// Reads every row of a cavity spreadsheet.
///
/// The header is checked for [`REQUIRED_COLUMNS`] before any row is parsed.
/// Columns outside the required set land in [`CavityRecord::extra`].
pub fn load_records(path: &Path) -> Result<Vec<CavityRecord>, SkipReason> {
    let file = File::open(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| SkipReason::Unreadable(e.to_string()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SkipReason::MissingColumns(missing));
    }

    let position = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    let i_index = position(COL_INDEX);
    let i_drugg = position(COL_DRUGGABILITY);
    let i_score = position(COL_DRUGSCORE);
    let i_surface = position(COL_SURFACE_AREA);

    let mut records = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| SkipReason::Unreadable(e.to_string()))?;
        let cell = |i: usize| record.get(i).unwrap_or("").trim();

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !REQUIRED_COLUMNS.contains(&h.as_str()))
            .map(|(i, h)| (h.clone(), cell(i).to_string()))
            .collect::<BTreeMap<_, _>>();

        records.push(CavityRecord {
            index: cell(i_index).to_string(),
            druggability: Druggability::from_label(record.get(i_drugg).unwrap_or("")),
            drug_score: parse_number(cell(i_score), COL_DRUGSCORE, row)?,
            surface_area: parse_number(cell(i_surface), COL_SURFACE_AREA, row)?,
            extra,
        });
    }

    debug!(path = %path.display(), rows = records.len(), "Cavity rows loaded");
    Ok(records)
}

/// Empty cells and `NaN` are missing values; any other non-numeric text is
/// a malformed file.
fn parse_number(raw: &str, column: &str, row: usize) -> Result<Option<f64>, SkipReason> {
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(SkipReason::Unreadable(format!(
            "row {}: {} value '{}' is not a number",
            row + 1,
            column,
            raw
        ))),
    }
}
