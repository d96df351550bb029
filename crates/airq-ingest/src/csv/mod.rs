//! CSV reading and writing.

mod header;
mod reader;
mod writer;

pub use header::{normalize_header, rename_columns, strip_column_names};
pub use reader::{read_csv_text, validate_encoding};
pub use writer::{save_region_csv, write_csv};
