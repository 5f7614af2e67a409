//! Ramachandran score explorer.
//!
//! Loads a per-model score table, tags each model from its file name
//! (structure, software, protein, model number, relaxation level) and
//! selects/ranks models through the pure [`filter::filter_scores`].

pub mod filter;
pub mod loader;
pub mod types;
