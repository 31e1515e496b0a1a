//! Loading source documents and writing results.
//!
//! Parsing and serialization are CPU-bound, so both run on tokio's blocking
//! pool and never stall the async caller.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplice::io::{PdfReader, PdfWriter};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let source = reader.load(Path::new("input.pdf")).await?;
//! println!("{} has {} pages", source.original_name(), source.page_count());
//!
//! let writer = PdfWriter::new();
//! writer.save(source.document(), Path::new("copy.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::PdfReader;
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
