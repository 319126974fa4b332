//! Artifact export: breakout report CSV, indicator-augmented series CSV, and
//! a JSON run manifest.
//!
//! Files are written flat into the output directory, named after the ticker:
//! `{TICKER}_breakout_report.csv`, `{TICKER}_series.csv`,
//! `{TICKER}_manifest.json`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use volbreak_core::data::{CanonicalizeReport, DataSource};
use volbreak_core::fingerprint::RunFingerprint;
use volbreak_core::report::{series_to_csv_string, to_csv_string};
use volbreak_core::{BreakoutConfig, ColumnSet, ReportSummary};

use crate::runner::AnalysisRun;

/// Current schema version for the run manifest.
pub const SCHEMA_VERSION: u32 = 1;

/// Machine-readable record of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub symbol: String,
    pub generated_at: DateTime<Utc>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub data_source: DataSource,
    pub has_synthetic: bool,
    pub fingerprint: RunFingerprint,
    pub config: BreakoutConfig,
    pub canonicalize: CanonicalizeReport,
    pub summary: ReportSummary,
}

impl RunManifest {
    pub fn from_run(run: &AnalysisRun) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            symbol: run.symbol().to_string(),
            generated_at: Utc::now(),
            first_date: run.analysis.series.first_date(),
            last_date: run.analysis.series.last_date(),
            data_source: run.source,
            has_synthetic: run.has_synthetic,
            fingerprint: run.fingerprint.clone(),
            config: run.analysis.config.clone(),
            canonicalize: run.canonicalize.clone(),
            summary: run.summary.clone(),
        }
    }
}

/// Paths written by `save_artifacts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub report_csv: PathBuf,
    pub series_csv: PathBuf,
    pub manifest: PathBuf,
}

/// File-name stem for a ticker (path separators replaced).
fn file_stem(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect()
}

pub fn report_csv_path(output_dir: &Path, symbol: &str) -> PathBuf {
    output_dir.join(format!("{}_breakout_report.csv", file_stem(symbol)))
}

pub fn series_csv_path(output_dir: &Path, symbol: &str) -> PathBuf {
    output_dir.join(format!("{}_series.csv", file_stem(symbol)))
}

pub fn manifest_path(output_dir: &Path, symbol: &str) -> PathBuf {
    output_dir.join(format!("{}_manifest.json", file_stem(symbol)))
}

fn ensure_dir(output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))
}

/// Write the indicator-augmented series only.
pub fn save_series_csv(run: &AnalysisRun, output_dir: &Path) -> Result<PathBuf> {
    ensure_dir(output_dir)?;
    let path = series_csv_path(output_dir, run.symbol());
    let csv = series_to_csv_string(&run.analysis).context("failed to render series CSV")?;
    std::fs::write(&path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = run.analysis.series.len(), "series CSV written");
    Ok(path)
}

/// Write the full artifact set.
pub fn save_artifacts(
    run: &AnalysisRun,
    output_dir: &Path,
    columns: ColumnSet,
) -> Result<ArtifactPaths> {
    ensure_dir(output_dir)?;
    let symbol = run.symbol();

    let report_csv = report_csv_path(output_dir, symbol);
    let csv = to_csv_string(&run.report, columns).context("failed to render breakout report")?;
    std::fs::write(&report_csv, csv)
        .with_context(|| format!("failed to write {}", report_csv.display()))?;

    let series_csv = save_series_csv(run, output_dir)?;

    let manifest = manifest_path(output_dir, symbol);
    let json = serde_json::to_string_pretty(&RunManifest::from_run(run))
        .context("failed to serialize run manifest")?;
    std::fs::write(&manifest, json)
        .with_context(|| format!("failed to write {}", manifest.display()))?;

    info!(
        dir = %output_dir.display(),
        rows = run.report.rows.len(),
        "artifacts saved"
    );

    Ok(ArtifactPaths {
        report_csv,
        series_csv,
        manifest,
    })
}

/// Read a manifest back. Rejects unknown schema versions.
pub fn load_manifest(path: &Path) -> Result<RunManifest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: RunManifest =
        serde_json::from_str(&json).context("failed to parse run manifest")?;
    if manifest.schema_version != SCHEMA_VERSION {
        bail!(
            "unsupported manifest schema version {} (expected {SCHEMA_VERSION})",
            manifest.schema_version
        );
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_follow_ticker() {
        let dir = Path::new("out");
        assert_eq!(
            report_csv_path(dir, "AAPL"),
            PathBuf::from("out/AAPL_breakout_report.csv")
        );
        assert_eq!(series_csv_path(dir, "BRK.B"), PathBuf::from("out/BRK.B_series.csv"));
        assert_eq!(manifest_path(dir, "A/B"), PathBuf::from("out/A_B_manifest.json"));
    }
}
