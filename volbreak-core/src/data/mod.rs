//! Series sources and ingestion: provider seam, Yahoo Finance, local CSV,
//! synthetic data, and canonicalization into engine bars.

pub mod canonicalize;
pub mod circuit_breaker;
pub mod csv_import;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use canonicalize::{canonicalize, CanonicalizeReport};
pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use csv_import::{load_bars_csv, read_bars_csv};
pub use provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
pub use synthetic::generate_synthetic_bars;
pub use yahoo::YahooProvider;
