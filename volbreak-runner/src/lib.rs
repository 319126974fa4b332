//! Volbreak Runner: analysis orchestration on top of `volbreak-core`.
//!
//! This crate provides:
//! - The TOML analysis config file
//! - Series loading with CSV / provider / synthetic fallback
//! - A single-ticker runner producing the report, summary and fingerprint
//! - Artifact export (report CSV, series CSV, JSON manifest)

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;

pub use config::{AnalysisConfig, AnalysisSection, ConfigError, ThresholdsSection};
pub use data_loader::{load_series, LoadError, LoadOptions, LoadedSeries};
pub use export::{load_manifest, save_artifacts, save_series_csv, ArtifactPaths, RunManifest};
pub use runner::{run_analysis, run_analysis_on_series, AnalysisRun, RunError};
