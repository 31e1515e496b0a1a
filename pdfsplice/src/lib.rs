//! pdfsplice - Split, merge and reorder the pages of PDF documents.
//!
//! The library is built in layers:
//!
//! - [`selection`] parses page selections (`"1,3-5"`) and page orders
//! - [`transform`] applies page-level operations to abstract page sequences
//! - [`assemble`] turns a page sequence back into a valid PDF
//! - [`io`] loads sources and writes results
//! - [`engine`] runs the whole pipeline
//!
//! # Examples
//!
//! ## Merging two files
//!
//! ```no_run
//! use pdfsplice::config::Config;
//! use pdfsplice::engine::Engine;
//! use pdfsplice::transform::TransformRequest;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::new(vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
//! config.output = Some(PathBuf::from("combined.pdf"));
//!
//! let artifact = Engine::from_config(&config)
//!     .execute(&config, &TransformRequest::Merge)
//!     .await?;
//! println!("Created {} page document", artifact.page_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using individual components
//!
//! ```no_run
//! use pdfsplice::assemble::DocumentAssembler;
//! use pdfsplice::io::{PdfReader, PdfWriter};
//! use pdfsplice::transform;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = PdfReader::new().load(Path::new("input.pdf")).await?;
//!
//! let pages = transform::reorder(&source.pages(), &[2, 0, 1])?;
//! let document = DocumentAssembler::new().assemble(&[&source], &pages)?;
//!
//! PdfWriter::new().save(&document, Path::new("reordered.pdf")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod io;
pub mod naming;
pub mod notice;
pub mod selection;
pub mod transform;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use document::{PageHandle, SourceDocument};
pub use engine::{Engine, SavedArtifact, TransformOutput};
pub use error::{PdfSpliceError, Result};
pub use selection::PageSelection;
pub use transform::{Operation, PageSequence, TransformRequest};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
