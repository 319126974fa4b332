//! Report assembly, display formatting, and CSV export.

pub mod export;
pub mod format;
pub mod table;

pub use export::{series_to_csv_string, to_csv_string, ReportError};
pub use format::{format_grouped, format_optional, format_plain, format_price, format_volume};
pub use table::{render_text, BreakoutReport, ColumnSet, ReportRow, ReportSummary, ReturnTone};
