//! Data types used by the cavity summary pipeline.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Column headers every cavity spreadsheet must expose.
pub const COL_INDEX: &str = "Index";
pub const COL_DRUGGABILITY: &str = "Druggability";
pub const COL_DRUGSCORE: &str = "DrugScore";
pub const COL_SURFACE_AREA: &str = "Surface Area (Å2)";

pub const REQUIRED_COLUMNS: [&str; 4] =
    [COL_INDEX, COL_DRUGGABILITY, COL_DRUGSCORE, COL_SURFACE_AREA];

/// Druggability class assigned to a predicted pocket.
///
/// Parsing is total: labels outside the known set become
/// [`Druggability::Unrecognized`] instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Druggability {
    Weak,
    Medium,
    Strong,
    Unrecognized(String),
}

impl Druggability {
    /// Exact, case-sensitive match; padded labels are unrecognized.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Weak" => Druggability::Weak,
            "Medium" => Druggability::Medium,
            "Strong" => Druggability::Strong,
            other => Druggability::Unrecognized(other.to_string()),
        }
    }

    /// Numeric weight used for the druggability mean.
    ///
    /// | Class        | Score |
    /// |--------------|-------|
    /// | Medium       | 2     |
    /// | Strong       | 3     |
    /// | Weak         | -     |
    /// | Unrecognized | -     |
    pub fn score(&self) -> Option<f64> {
        match self {
            Druggability::Medium => Some(2.0),
            Druggability::Strong => Some(3.0),
            Druggability::Weak | Druggability::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for Druggability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Druggability::Weak => f.write_str("Weak"),
            Druggability::Medium => f.write_str("Medium"),
            Druggability::Strong => f.write_str("Strong"),
            Druggability::Unrecognized(label) => f.write_str(label),
        }
    }
}

/// A single cavity row read from a spreadsheet.
///
/// Empty numeric cells are kept as `None` so they behave like missing
/// values: they never satisfy the `DrugScore >= 0` filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CavityRecord {
    pub index: String,
    pub druggability: Druggability,
    pub drug_score: Option<f64>,
    pub surface_area: Option<f64>,
    pub extra: BTreeMap<String, String>,
}

/// Per-file aggregate computed from the filtered rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetrics {
    pub file: String,
    pub promedio_druggability: Option<f64>,
    pub conteo_strong: usize,
    pub max_drugscore: f64,
    pub avg_drugscore: f64,
    /// `None` when no surviving row carries a surface area.
    pub max_surface_area: Option<f64>,
    pub index_max_surface: Option<String>,
    pub top3_indices: Vec<String>,
}

/// Winning file for a single leaderboard metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leader {
    pub file: String,
    pub value: f64,
}

/// Best file per metric for one folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    /// `None` when no file produced a druggability mean.
    pub promedio_druggability: Option<Leader>,
    pub conteo_strong: Leader,
    pub max_drugscore: Leader,
    pub avg_drugscore: Leader,
    /// `None` when no file has a surface area.
    pub max_surface_area: Option<Leader>,
    pub index_max_surface: Option<String>,
}

/// JSON export of one folder's run.
#[derive(Debug, Serialize)]
pub struct FolderSummary {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub folder: String,
    pub files: Vec<FileMetrics>,
    pub leaderboard: Option<Leaderboard>,
}
