use std::path::PathBuf;

/// Folders summarized when none are given on the command line.
pub const DEFAULT_FOLDERS: [&str; 4] = [
    "TopModels/Dimer/Anguila",
    "TopModels/Dimer/Human",
    "TopModels/Monomer/Anguila",
    "TopModels/Monomer/Human",
];

pub const DEFAULT_EXTENSION: &str = "csv";
pub const DEFAULT_REPORT_NAME: &str = "summary.txt";

/// Settings for a `summarize` run.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub folders: Vec<PathBuf>,
    /// Spreadsheet extension, without the dot.
    pub extension: String,
    /// Report file name created inside each folder.
    pub report_name: String,
    /// Also write `<report stem>.json` next to the report.
    pub json: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            folders: DEFAULT_FOLDERS.iter().map(PathBuf::from).collect(),
            extension: DEFAULT_EXTENSION.to_string(),
            report_name: DEFAULT_REPORT_NAME.to_string(),
            json: false,
        }
    }
}

impl SummaryConfig {
    /// Builds a config from CLI values, falling back to [`DEFAULT_FOLDERS`]
    /// when `folders` is empty.
    pub fn new(folders: Vec<PathBuf>, extension: &str, report_name: &str, json: bool) -> Self {
        let defaults = Self::default();
        Self {
            folders: if folders.is_empty() {
                defaults.folders
            } else {
                folders
            },
            extension: extension.trim_start_matches('.').to_string(),
            report_name: report_name.to_string(),
            json,
        }
    }
}
