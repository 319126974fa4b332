//! Analysis runner: wires loading, the engine, and report assembly.
//!
//! Two entry points:
//! - `run_analysis()`: loads the series per `LoadOptions`, then runs. Used by the CLI.
//! - `run_analysis_on_series()`: takes an already loaded series. Used by tests
//!   and by callers that bring their own data.

use thiserror::Error;
use tracing::info;

use volbreak_core::data::{CanonicalizeReport, DataProvider, DataSource};
use volbreak_core::fingerprint::RunFingerprint;
use volbreak_core::{analyze, Analysis, BreakoutConfig, BreakoutReport, ReportSummary};

use crate::config::{AnalysisConfig, ConfigError};
use crate::data_loader::{load_series, LoadError, LoadOptions, LoadedSeries};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Everything produced by one analysis, ready for display and export.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub analysis: Analysis,
    pub report: BreakoutReport,
    pub summary: ReportSummary,
    pub fingerprint: RunFingerprint,
    pub source: DataSource,
    pub canonicalize: CanonicalizeReport,
    pub has_synthetic: bool,
}

impl AnalysisRun {
    pub fn symbol(&self) -> &str {
        self.analysis.series.symbol()
    }
}

/// Load the configured ticker and analyze it.
pub fn run_analysis(
    config: &AnalysisConfig,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
) -> Result<AnalysisRun, RunError> {
    config.validate()?;
    let loaded = load_series(config.ticker(), provider, opts)?;
    run_analysis_on_series(loaded, &config.breakout_config())
}

/// Analyze a series that is already loaded.
pub fn run_analysis_on_series(
    loaded: LoadedSeries,
    config: &BreakoutConfig,
) -> Result<AnalysisRun, RunError> {
    let fingerprint = RunFingerprint::new(&loaded.series, config);
    let analysis = analyze(loaded.series, config).map_err(ConfigError::from)?;
    let report = BreakoutReport::build(&analysis);
    let summary = report.summary();

    info!(
        symbol = analysis.series.symbol(),
        bars = analysis.series.len(),
        breakouts = summary.breakout_count,
        measured = summary.measured_count,
        synthetic = loaded.has_synthetic,
        "analysis finished"
    );

    Ok(AnalysisRun {
        analysis,
        report,
        summary,
        fingerprint,
        source: loaded.source,
        canonicalize: loaded.canonicalize,
        has_synthetic: loaded.has_synthetic,
    })
}
