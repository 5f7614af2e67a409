pub mod cavity;
pub mod config;
pub mod heatmap;
pub mod output;
pub mod quality;
pub mod utility;
