//! FILENAME: app/pivot-cli/src/lib.rs
//! Pivot CLI: loads a dataset, runs the pivot engine, prints JSON.

pub mod cli;
pub mod logging;

pub use cli::{build_config, run, Args};
