use crate::quality::types::{
    BASE_RELAXATION, COL_FAVORED, COL_FILE_NAME, COL_OUTLIERS, COL_Z_SCORE, Protein, ScoreRow,
    Software, Structure,
};
use anyhow::{Context, Result, bail};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Decodes model tags embedded in a file name such as
/// `MON-AF-NCChumano-01-Relaxed2.pdb`.
pub struct FileNameParser {
    structure: Regex,
    software: Regex,
    protein: Regex,
    model: Regex,
    relaxed: Regex,
}

pub struct FileNameTags {
    pub structure: Option<Structure>,
    pub software: Option<Software>,
    pub protein: Option<Protein>,
    pub model_base: Option<String>,
    pub relaxation: String,
}

impl FileNameParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            structure: Regex::new(r"^(MON|DIM)")?,
            software: Regex::new(r"-(AF|RF|SM|MD)")?,
            protein: Regex::new(r"-(NCChumano|NCCAnguila)")?,
            model: Regex::new(r"-(\d{2})")?,
            relaxed: Regex::new(r"-(Relaxed\d?)")?,
        })
    }

    pub fn parse(&self, name: &str) -> FileNameTags {
        let first = |re: &Regex| {
            re.captures(name)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        };

        FileNameTags {
            structure: first(&self.structure).and_then(|s| Structure::from_code(&s)),
            software: first(&self.software).and_then(|s| Software::from_code(&s)),
            protein: first(&self.protein).and_then(|s| Protein::from_code(&s)),
            model_base: first(&self.model),
            relaxation: first(&self.relaxed).unwrap_or_else(|| BASE_RELAXATION.to_string()),
        }
    }
}

/// Loads a Ramachandran score table and tags every row from its `FileName`.
pub fn load_scores(path: &Path) -> Result<Vec<ScoreRow>> {
    let file =
        File::open(path).with_context(|| format!("cannot open scores {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let position = |name: &str| -> Result<usize> {
        match headers.iter().position(|h| h == name) {
            Some(i) => Ok(i),
            None => bail!("{} is missing column '{}'", path.display(), name),
        }
    };
    let i_name = position(COL_FILE_NAME)?;
    let i_favored = position(COL_FAVORED)?;
    let i_outliers = position(COL_OUTLIERS)?;
    let i_z = position(COL_Z_SCORE)?;
    let known = [i_name, i_favored, i_outliers, i_z];

    let parser = FileNameParser::new()?;
    let mut rows = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let cell = |i: usize| record.get(i).unwrap_or("").trim();
        let number = |i: usize| -> Result<Option<f64>> {
            let raw = cell(i);
            if raw.is_empty() {
                return Ok(None);
            }
            let v: f64 = raw.parse().with_context(|| {
                format!("row {}: '{}' in '{}' is not a number", line + 1, raw, headers[i])
            })?;
            Ok(if v.is_nan() { None } else { Some(v) })
        };

        let file_name = cell(i_name).to_string();
        let tags = parser.parse(&file_name);
        if tags.software.is_none() {
            debug!(file_name = %file_name, "No software tag in file name");
        }

        rows.push(ScoreRow {
            structure: tags.structure,
            software: tags.software,
            protein: tags.protein,
            model_base: tags.model_base,
            relaxation: tags.relaxation,
            favored: number(i_favored)?,
            outliers: number(i_outliers)?,
            z_score: number(i_z)?,
            extra: headers
                .iter()
                .enumerate()
                .filter(|(i, _)| !known.contains(i))
                .map(|(i, h)| (h.clone(), cell(i).to_string()))
                .collect::<BTreeMap<_, _>>(),
            file_name,
        });
    }

    info!(path = %path.display(), rows = rows.len(), "Scores loaded");
    Ok(rows)
}
