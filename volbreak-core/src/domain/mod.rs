//! Domain types for Volbreak

pub mod bar;
pub mod series;

pub use bar::{Bar, BarField};
pub use series::{PriceSeries, SeriesError};
