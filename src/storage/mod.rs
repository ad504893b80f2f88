//! File storage for the batch: input ingestion and output emission
//!
//! Each file is opened, fully consumed or written, and closed inside the
//! function that uses it.

pub mod input;
pub mod output;

pub use input::{InputRow, RowSkip, read_input_records};
pub use output::{OUTPUT_FILE_NAME, OutputRecord, output_file_path, write_output, write_rows};
