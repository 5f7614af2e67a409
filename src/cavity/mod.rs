//! Cavity druggability summaries.
//!
//! Scans folders of cavity-detection spreadsheets, filters out weak and
//! negative-score pockets, reduces each file to a [`types::FileMetrics`] and
//! ranks the files of a folder per metric in a plain-text report.

pub mod analyzer;
pub mod leaderboard;
pub mod loader;
pub mod metrics;
pub mod scanner;
pub mod types;
