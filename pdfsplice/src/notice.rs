//! Structured outcome messages.
//!
//! A [`Notice`] says what happened to an operation without deciding how to
//! show it. Front ends render notices as text or emit them as JSON.

use serde::Serialize;

use crate::error::{LoadError, PdfSpliceError, TransformError, WriteError};
use crate::transform::Operation;

/// How serious a notice is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Neutral information.
    Info,
    /// The operation produced its artifact.
    Success,
    /// The artifact was produced, but something deserves attention.
    Warning,
    /// The operation failed.
    Error,
}

/// What a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeCode {
    /// The artifact was written.
    Completed,
    /// The output has no pages.
    EmptyOutput,
    /// Some selected pages do not exist and were skipped.
    SelectionOutOfRange,
    /// The page selection could not be parsed.
    InvalidPageRange,
    /// The page order could not be parsed.
    InvalidPageOrder,
    /// A page index is out of range.
    InvalidPageIndex,
    /// The operation got the wrong number of documents.
    WrongSourceCount,
    /// An input file is missing.
    FileNotFound,
    /// An input file could not be read.
    UnreadableFile,
    /// An input is not a readable PDF.
    MalformedPdf,
    /// An input is encrypted.
    EncryptedPdf,
    /// An input has no page tree.
    MissingPageTree,
    /// The output file exists and may not be replaced.
    OutputExists,
    /// Writing the output failed.
    WriteFailed,
    /// The output document could not be built.
    AssemblyFailed,
    /// The output would exceed the page ceiling.
    PageLimitExceeded,
    /// The configuration is invalid.
    InvalidConfig,
    /// The user cancelled.
    Cancelled,
    /// An unexpected internal failure.
    Internal,
}

impl NoticeCode {
    /// A short human-readable summary.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Completed => "operation completed",
            Self::EmptyOutput => "the output document has no pages",
            Self::SelectionOutOfRange => "some selected pages do not exist and were ignored",
            Self::InvalidPageRange => "invalid page range",
            Self::InvalidPageOrder => "invalid page order",
            Self::InvalidPageIndex => "page index out of range",
            Self::WrongSourceCount => "wrong number of documents",
            Self::FileNotFound => "file not found",
            Self::UnreadableFile => "file could not be read",
            Self::MalformedPdf => "not a readable PDF",
            Self::EncryptedPdf => "encrypted PDF",
            Self::MissingPageTree => "PDF has no pages",
            Self::OutputExists => "output file already exists",
            Self::WriteFailed => "output could not be written",
            Self::AssemblyFailed => "output document could not be built",
            Self::PageLimitExceeded => "too many pages",
            Self::InvalidConfig => "invalid configuration",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal error",
        }
    }
}

/// An outcome message for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// The operation concerned, if known.
    pub operation: Option<Operation>,
    /// How serious it is.
    pub severity: Severity,
    /// What it is about.
    pub code: NoticeCode,
}

impl Notice {
    /// Create a notice.
    pub fn new(operation: Option<Operation>, severity: Severity, code: NoticeCode) -> Self {
        Self {
            operation,
            severity,
            code,
        }
    }

    /// The artifact of `operation` was written.
    pub fn completed(operation: Operation) -> Self {
        Self::new(Some(operation), Severity::Success, NoticeCode::Completed)
    }

    /// A warning about an otherwise successful `operation`.
    pub fn warning(operation: Operation, code: NoticeCode) -> Self {
        Self::new(Some(operation), Severity::Warning, code)
    }

    /// Project an error onto a notice.
    ///
    /// Input mistakes the user can correct are warnings; everything else is
    /// an error.
    pub fn for_error(operation: Option<Operation>, err: &PdfSpliceError) -> Self {
        let severity = if err.is_recoverable() {
            Severity::Warning
        } else {
            Severity::Error
        };
        Self::new(operation, severity, code_for(err))
    }
}

impl From<&PdfSpliceError> for Notice {
    fn from(err: &PdfSpliceError) -> Self {
        Self::for_error(None, err)
    }
}

fn code_for(err: &PdfSpliceError) -> NoticeCode {
    match err {
        PdfSpliceError::InvalidPageRange(_) => NoticeCode::InvalidPageRange,
        PdfSpliceError::InvalidPageOrder(_) => NoticeCode::InvalidPageOrder,
        PdfSpliceError::Transform(TransformError::InvalidIndex(_)) => NoticeCode::InvalidPageIndex,
        PdfSpliceError::Transform(TransformError::SourceCount { .. }) => {
            NoticeCode::WrongSourceCount
        }
        PdfSpliceError::Load(load) => match load {
            LoadError::NotFound { .. } => NoticeCode::FileNotFound,
            LoadError::NotAFile { .. } | LoadError::Unreadable { .. } => NoticeCode::UnreadableFile,
            LoadError::Malformed { .. } => NoticeCode::MalformedPdf,
            LoadError::Encrypted { .. } => NoticeCode::EncryptedPdf,
            LoadError::NoPageTree { .. } => NoticeCode::MissingPageTree,
            LoadError::Task(_) => NoticeCode::Internal,
        },
        PdfSpliceError::Write(WriteError::OutputExists { .. }) => NoticeCode::OutputExists,
        PdfSpliceError::Write(WriteError::Task(_)) => NoticeCode::Internal,
        PdfSpliceError::Write(_) | PdfSpliceError::Io(_) => NoticeCode::WriteFailed,
        PdfSpliceError::Assemble(_) => NoticeCode::AssemblyFailed,
        PdfSpliceError::PageLimitExceeded { .. } => NoticeCode::PageLimitExceeded,
        PdfSpliceError::InvalidConfig { .. } => NoticeCode::InvalidConfig,
        PdfSpliceError::Cancelled => NoticeCode::Cancelled,
    }
}
