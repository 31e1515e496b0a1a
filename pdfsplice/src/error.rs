//! Error types for pdfsplice.
//!
//! Errors are split by the layer that raises them so callers can react to
//! each family differently:
//!
//! - **Selection errors**: malformed page-range or page-order input
//! - **Transform errors**: reorder indices out of bounds, wrong source count
//! - **Load/Write errors**: I/O failures at the document boundary
//! - **Assembly errors**: source documents whose structure cannot be rebuilt
//!
//! [`PdfSpliceError`] wraps all of them for callers that only want one type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::transform::Operation;

/// Result type alias for pdfsplice operations.
pub type Result<T> = std::result::Result<T, PdfSpliceError>;

/// Why a page-range token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeErrorReason {
    /// The token was empty after trimming.
    Empty,
    /// The token (or one side of a range) is not a base-10 integer.
    NotANumber,
    /// A dash is present but one side is missing or there are extra dashes.
    MalformedRange,
    /// The range runs backwards (`start > end`).
    ReversedRange,
    /// Both ends of the range are the same page (`start == end`).
    DegenerateRange,
    /// The range spans more pages than a selection may expand to.
    RangeTooLarge,
}

impl RangeErrorReason {
    fn describe(&self) -> &'static str {
        match self {
            Self::Empty => "empty entry",
            Self::NotANumber => "not a page number",
            Self::MalformedRange => "malformed range, expected <start>-<end>",
            Self::ReversedRange => "start page is after end page",
            Self::DegenerateRange => "a range must span at least two pages",
            Self::RangeTooLarge => "range spans too many pages",
        }
    }
}

/// A page-selection expression could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid page range '{token}' (entry {position}): {}", .reason.describe())]
pub struct InvalidPageRangeError {
    /// The offending token, trimmed.
    pub token: String,
    /// 1-based position of the token in the comma-separated input.
    pub position: usize,
    /// What was wrong with it.
    pub reason: RangeErrorReason,
}

/// Why a page-order token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderErrorReason {
    /// The token was empty after trimming.
    Empty,
    /// The token is not a non-negative base-10 integer.
    NotAnIndex,
}

impl OrderErrorReason {
    fn describe(&self) -> &'static str {
        match self {
            Self::Empty => "empty entry",
            Self::NotAnIndex => "not a page index",
        }
    }
}

/// A reorder index list could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid page order entry '{token}' at position {position}: {}", .reason.describe())]
pub struct InvalidPageOrderError {
    /// The offending token, trimmed.
    pub token: String,
    /// 1-based position of the token in the comma-separated input.
    pub position: usize,
    /// What was wrong with it.
    pub reason: OrderErrorReason,
}

/// A reorder request referenced a page that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "page index {index} at position {position} is out of range: document has {page_count} page(s), valid indices are 0..{page_count}"
)]
pub struct InvalidIndexError {
    /// The out-of-range 0-based index.
    pub index: usize,
    /// 0-based position of the index within the order list.
    pub position: usize,
    /// Page count of the source document.
    pub page_count: usize,
}

/// Errors raised while applying a [`TransformRequest`](crate::transform::TransformRequest).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A reorder index is out of bounds.
    #[error(transparent)]
    InvalidIndex(#[from] InvalidIndexError),

    /// The request was given the wrong number of source documents.
    #[error("{operation} needs {expected} source document(s), got {found}")]
    SourceCount {
        /// The requested operation.
        operation: Operation,
        /// How many sources the operation takes.
        expected: usize,
        /// How many were supplied.
        found: usize,
    },
}

/// A source document could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    NotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file could not be read.
    #[error("Cannot read file: {}\n  Reason: {source}", .path.display())]
    Unreadable {
        /// Path to the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The bytes are not a readable PDF.
    #[error("Failed to load PDF: {name}\n  Reason: {reason}")]
    Malformed {
        /// File name or label of the source.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// The PDF is encrypted; encrypted inputs are not processed.
    #[error(
        "PDF is encrypted and cannot be processed: {name}\n  Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    Encrypted {
        /// File name or label of the source.
        name: String,
    },

    /// The PDF has no usable page tree.
    #[error("PDF has no page tree: {name}")]
    NoPageTree {
        /// File name or label of the source.
        name: String,
    },

    /// The blocking load task did not complete.
    #[error("Load task failed: {0}")]
    Task(String),
}

/// An assembled document could not be written.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create the output (or temporary) file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    CreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Document serialization failed.
    #[error("Failed to write PDF: {}\n  Reason: {reason}", .path.display())]
    Serialize {
        /// Path being written to.
        path: PathBuf,
        /// Serializer message.
        reason: String,
    },

    /// Flushing buffered output failed.
    #[error("Failed to flush output file: {}\n  Reason: {source}", .path.display())]
    Flush {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Moving the finished temporary file into place failed.
    #[error("Failed to move output into place: {}\n  Reason: {source}", .path.display())]
    Persist {
        /// Final output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The blocking write task did not complete.
    #[error("Write task failed: {0}")]
    Task(String),
}

/// A page sequence could not be turned into a PDF document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    /// A page handle points at a source document that was not supplied.
    #[error("page {index} belongs to a source document that was not supplied")]
    UnknownSource {
        /// Page index within its source.
        index: usize,
    },

    /// A page handle points at an object the source does not contain.
    #[error("page {index} of '{source_name}' is missing from the document")]
    MissingPage {
        /// Page index within its source.
        index: usize,
        /// Name of the source document.
        source_name: String,
    },

    /// The combined object id space would overflow.
    #[error("too many objects to combine the source documents")]
    IdSpaceExhausted,

    /// A source page is not a dictionary or is otherwise malformed.
    #[error("malformed page structure: {0}")]
    Structure(String),
}

/// Main error type for pdfsplice operations.
#[derive(Debug, Error)]
pub enum PdfSpliceError {
    /// Malformed page-range expression.
    #[error(transparent)]
    InvalidPageRange(#[from] InvalidPageRangeError),

    /// Malformed page-order list.
    #[error(transparent)]
    InvalidPageOrder(#[from] InvalidPageOrderError),

    /// Transformation request failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Loading a source document failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Writing the result failed.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Building the output document failed.
    #[error("Failed to assemble output document: {0}")]
    Assemble(#[from] AssembleError),

    /// The output would exceed the configured page ceiling.
    #[error("Output would have {pages} pages, more than the allowed {limit}")]
    PageLimitExceeded {
        /// Pages the output would contain.
        pages: usize,
        /// Configured ceiling.
        limit: usize,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<InvalidIndexError> for PdfSpliceError {
    fn from(err: InvalidIndexError) -> Self {
        Self::Transform(TransformError::InvalidIndex(err))
    }
}

impl PdfSpliceError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Check if this error can be fixed by asking the user for new input.
    ///
    /// Bad selections and out-of-range indices are recoverable; I/O and
    /// structural failures are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidPageRange(_)
                | Self::InvalidPageOrder(_)
                | Self::Transform(TransformError::InvalidIndex(_))
                | Self::PageLimitExceeded { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidPageRange(_) => 1,
            Self::InvalidPageOrder(_) => 1,
            Self::Transform(_) => 1,
            Self::PageLimitExceeded { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Load(LoadError::NotFound { .. })
            | Self::Load(LoadError::NotAFile { .. })
            | Self::Load(LoadError::Unreadable { .. }) => 2,
            Self::Load(_) => 3,
            Self::Write(WriteError::OutputExists { .. }) => 4,
            Self::Write(_) => 5,
            Self::Io(_) => 5,
            Self::Assemble(_) => 6,
            Self::Cancelled => 130,
        }
    }
}
