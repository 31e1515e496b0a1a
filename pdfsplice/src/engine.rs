//! Running a transformation end to end.
//!
//! The [`Engine`] ties the pieces together: it loads sources, applies a
//! [`TransformRequest`], assembles the resulting pages into a new document,
//! enforces the page ceiling and writes the artifact.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplice::config::Config;
//! use pdfsplice::engine::Engine;
//! use pdfsplice::selection::PageSelection;
//! use pdfsplice::transform::TransformRequest;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(vec![PathBuf::from("report.pdf")]);
//! let request = TransformRequest::RemovePages {
//!     selection: PageSelection::parse("2,5-7")?,
//! };
//!
//! let artifact = Engine::from_config(&config).execute(&config, &request).await?;
//! println!("Wrote {} pages to {}", artifact.page_count, artifact.path.display());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use lopdf::Document;
use serde::Serialize;
use tracing::{debug, info};

use crate::assemble::DocumentAssembler;
use crate::config::Config;
use crate::document::SourceDocument;
use crate::error::{PdfSpliceError, Result, TransformError};
use crate::io::{PdfReader, PdfWriter};
use crate::naming::OutputName;
use crate::notice::{Notice, NoticeCode};
use crate::selection::PageSelection;
use crate::transform::{Operation, PageSequence, TransformRequest};

/// An assembled document that has not been written yet.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// The new document.
    pub document: Document,

    /// The operation that produced it.
    pub operation: Operation,

    /// Names of the source documents, in order.
    pub sources: Vec<String>,

    /// Number of pages in the new document.
    pub page_count: usize,

    /// Generated file name for the artifact.
    pub suggested_name: OutputName,

    /// Warnings raised while transforming.
    pub notices: Vec<Notice>,
}

/// A written artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedArtifact {
    /// Where the artifact was written.
    pub path: PathBuf,

    /// The operation that produced it.
    pub operation: Operation,

    /// Names of the source documents, in order.
    pub sources: Vec<String>,

    /// Number of pages written.
    pub page_count: usize,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Whether streams were compressed.
    pub compressed: bool,

    /// Outcome messages, ending with the completion notice.
    pub notices: Vec<Notice>,
}

/// Orchestrates load, transform, assemble and write.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    reader: PdfReader,
    assembler: DocumentAssembler,
    max_output_pages: Option<usize>,
}

impl Engine {
    /// Create an engine with no page ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine that follows `config`'s policies.
    pub fn from_config(config: &Config) -> Self {
        Self::new().with_page_limit(config.max_output_pages)
    }

    /// Refuse to build documents with more than `limit` pages.
    pub fn with_page_limit(mut self, limit: Option<usize>) -> Self {
        self.max_output_pages = limit;
        self
    }

    /// Use a custom assembler.
    pub fn with_assembler(mut self, assembler: DocumentAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Load one source document.
    pub async fn load(&self, path: &Path) -> Result<SourceDocument> {
        Ok(self.reader.load(path).await?)
    }

    /// Load several source documents concurrently, in order.
    pub async fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<SourceDocument>> {
        Ok(self.reader.load_all(paths).await?)
    }

    /// Remove the selected pages from `source`.
    pub fn split(&self, source: &SourceDocument, selection: PageSelection) -> Result<TransformOutput> {
        self.run(&TransformRequest::RemovePages { selection }, &[source])
    }

    /// Concatenate `first` and `second`.
    pub fn merge(&self, first: &SourceDocument, second: &SourceDocument) -> Result<TransformOutput> {
        self.run(&TransformRequest::Merge, &[first, second])
    }

    /// Rearrange the pages of `source`.
    pub fn reorder(&self, source: &SourceDocument, new_order: Vec<usize>) -> Result<TransformOutput> {
        self.run(&TransformRequest::Reorder { new_order }, &[source])
    }

    /// Apply `request` to `sources` and assemble the result.
    ///
    /// # Errors
    ///
    /// - [`PdfSpliceError::Transform`] for a bad reorder index or source count
    /// - [`PdfSpliceError::PageLimitExceeded`] if the result is over the ceiling
    /// - [`PdfSpliceError::Assemble`] if the document cannot be rebuilt
    pub fn run(
        &self,
        request: &TransformRequest,
        sources: &[&SourceDocument],
    ) -> Result<TransformOutput> {
        let operation = request.operation();
        let start = Instant::now();

        let sequences: Vec<PageSequence<_>> = sources.iter().map(|s| s.pages()).collect();
        let inputs: Vec<&PageSequence<_>> = sequences.iter().collect();
        let pages = request.apply(&inputs)?;

        if let Some(limit) = self.max_output_pages
            && pages.page_count() > limit
        {
            return Err(PdfSpliceError::PageLimitExceeded {
                pages: pages.page_count(),
                limit,
            });
        }

        let mut notices = Vec::new();
        if let TransformRequest::RemovePages { selection } = request
            && selection.count_within(sequences[0].page_count()) < selection.len()
        {
            notices.push(Notice::warning(operation, NoticeCode::SelectionOutOfRange));
        }
        if pages.is_empty() {
            notices.push(Notice::warning(operation, NoticeCode::EmptyOutput));
        }

        let document = self.assembler.assemble(sources, &pages)?;

        debug!(
            %operation,
            sources = sources.len(),
            pages = pages.page_count(),
            objects = document.objects.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "assembled output document"
        );

        Ok(TransformOutput {
            document,
            operation,
            sources: sources
                .iter()
                .map(|s| s.original_name().to_string())
                .collect(),
            page_count: pages.page_count(),
            suggested_name: OutputName::new(operation),
            notices,
        })
    }

    /// Write `output` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSpliceError::Write`] if the file cannot be written.
    pub async fn save(
        &self,
        output: TransformOutput,
        path: &Path,
        writer: &PdfWriter,
    ) -> Result<SavedArtifact> {
        let stats = writer.save(&output.document, path).await?;

        info!(
            operation = %output.operation,
            path = %stats.output_path.display(),
            pages = output.page_count,
            "artifact written"
        );

        let mut notices = output.notices;
        notices.push(Notice::completed(output.operation));

        Ok(SavedArtifact {
            path: stats.output_path,
            operation: output.operation,
            sources: output.sources,
            page_count: output.page_count,
            file_size: stats.file_size,
            compressed: stats.compressed,
            notices,
        })
    }

    /// Load the configured inputs, apply `request` and write the result.
    ///
    /// The result goes to `config.output` when set, otherwise to a generated
    /// name inside `config.output_dir`.
    ///
    /// # Errors
    ///
    /// Any error from validation, loading, transforming, assembling or writing.
    pub async fn execute(&self, config: &Config, request: &TransformRequest) -> Result<SavedArtifact> {
        config.validate()?;

        let operation = request.operation();
        let expected = operation.source_count();
        if config.inputs.len() != expected {
            return Err(TransformError::SourceCount {
                operation,
                expected,
                found: config.inputs.len(),
            }
            .into());
        }

        let writer = PdfWriter::with_options(config.write_options());
        if let Some(output) = &config.output {
            writer.can_write(output).await?;
        }

        let sources = self.load_all(&config.inputs).await?;
        let sources: Vec<&SourceDocument> = sources.iter().collect();
        let output = self.run(request, &sources)?;

        let path = config.output_path(&output.suggested_name.file_name());
        self.save(output, &path, &writer).await
    }
}
