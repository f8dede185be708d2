pub mod table;
pub mod errors;
pub mod format;

pub use table::Table;
pub use errors::{extract_clean_error, DashboardError, ValidationError};
pub use format::{format_amount, format_krw, format_signed_percent};
