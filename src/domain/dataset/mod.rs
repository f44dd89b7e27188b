//! Tabular training data as loaded from disk

mod column;
mod table;

pub use column::{is_missing_token, parse_numeric, ColumnKind, MISSING_TOKENS};
pub use table::RawTable;
