//! Structural-quality score rows and the metadata decoded from model file names.

use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const COL_FILE_NAME: &str = "FileName";
pub const COL_FAVORED: &str = "Ramachandran Favored (>98%)";
pub const COL_OUTLIERS: &str = "Ramachandran Outliers (<0.05%)";
pub const COL_Z_SCORE: &str = "Ramachandran Z-Score (abs(ZScore)<2)";

/// Relaxation level assigned when a file name carries no `Relaxed` tag.
pub const BASE_RELAXATION: &str = "Base";

/// Oligomeric state of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "UPPER")]
pub enum Structure {
    Mon,
    Dim,
}

/// Modelling software. Variant order is alphabetical so grouped output sorts
/// by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "UPPER")]
pub enum Software {
    Af,
    Md,
    Rf,
    Sm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum)]
pub enum Protein {
    #[serde(rename = "NCChumano")]
    #[value(name = "NCChumano")]
    NccHumano,
    #[serde(rename = "NCCAnguila")]
    #[value(name = "NCCAnguila")]
    NccAnguila,
}

impl Structure {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MON" => Some(Structure::Mon),
            "DIM" => Some(Structure::Dim),
            _ => None,
        }
    }
}

impl Software {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "AF" => Some(Software::Af),
            "MD" => Some(Software::Md),
            "RF" => Some(Software::Rf),
            "SM" => Some(Software::Sm),
            _ => None,
        }
    }
}

impl Protein {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NCChumano" => Some(Protein::NccHumano),
            "NCCAnguila" => Some(Protein::NccAnguila),
            _ => None,
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Structure::Mon => "MON",
            Structure::Dim => "DIM",
        })
    }
}

impl fmt::Display for Software {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Software::Af => "AF",
            Software::Md => "MD",
            Software::Rf => "RF",
            Software::Sm => "SM",
        })
    }
}

impl fmt::Display for Protein {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Protein::NccHumano => "NCChumano",
            Protein::NccAnguila => "NCCAnguila",
        })
    }
}

/// One model's Ramachandran scores plus the tags parsed from its file name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub file_name: String,
    pub structure: Option<Structure>,
    pub software: Option<Software>,
    pub protein: Option<Protein>,
    pub model_base: Option<String>,
    pub relaxation: String,
    pub favored: Option<f64>,
    pub outliers: Option<f64>,
    pub z_score: Option<f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Explicit selection applied to a score table.
///
/// Empty lists leave that dimension unconstrained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreFilter {
    pub structures: Vec<Structure>,
    pub software: Vec<Software>,
    pub proteins: Vec<Protein>,
    pub models: Vec<String>,
    /// Enables `relaxation_levels`.
    pub relaxed: bool,
    pub relaxation_levels: Vec<String>,
    /// Return every matching row unranked.
    pub all_models: bool,
    pub models_per_software: usize,
    pub top_n: usize,
}

impl Default for ScoreFilter {
    fn default() -> Self {
        Self {
            structures: Vec::new(),
            software: Vec::new(),
            proteins: Vec::new(),
            models: Vec::new(),
            relaxed: false,
            relaxation_levels: Vec::new(),
            all_models: false,
            models_per_software: 5,
            top_n: 10,
        }
    }
}

/// Favored-percentage distribution for one software.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoftwareStats {
    pub software: Software,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
}
