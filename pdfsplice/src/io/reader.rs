//! Reading PDF files into [`SourceDocument`]s.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use lopdf::{Document, Object};
use tokio::task;
use tracing::debug;

use crate::document::SourceDocument;
use crate::error::LoadError;

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether to check for a usable page tree after parsing.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that skips the page-tree check.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Load a PDF from disk.
    ///
    /// The source is named after the file name of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist or is not a regular file
    /// - The file cannot be read
    /// - The bytes are not a PDF, or the PDF is encrypted
    /// - The PDF has no page tree (unless verification is off)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfsplice::io::PdfReader;
    /// # use std::path::Path;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let source = PdfReader::new().load(Path::new("document.pdf")).await?;
    /// println!("Loaded {} pages", source.page_count());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load(&self, path: &Path) -> Result<SourceDocument, LoadError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| unreadable(path, e))?;
        if !metadata.is_file() {
            return Err(LoadError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| unreadable(path, e))?;
        self.load_bytes(display_name(path), bytes).await
    }

    /// Load a PDF that is already in memory.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the file-system cases.
    pub async fn load_bytes(
        &self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<SourceDocument, LoadError> {
        let name = name.into();
        let start = Instant::now();
        let size = bytes.len();

        let document = task::spawn_blocking(move || Document::load_mem(&bytes))
            .await
            .map_err(|e| LoadError::Task(e.to_string()))?
            .map_err(|e| {
                let reason = e.to_string();
                if reason.contains("encrypt") || reason.contains("password") {
                    LoadError::Encrypted { name: name.clone() }
                } else {
                    LoadError::Malformed {
                        name: name.clone(),
                        reason,
                    }
                }
            })?;

        if document.is_encrypted() {
            return Err(LoadError::Encrypted { name });
        }
        if self.verify && !has_page_tree(&document) {
            return Err(LoadError::NoPageTree { name });
        }

        let source = SourceDocument::new(name, document);
        debug!(
            name = source.original_name(),
            bytes = size,
            pages = source.page_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded source document"
        );
        Ok(source)
    }

    /// Load several documents concurrently, returning them in argument order.
    ///
    /// # Errors
    ///
    /// Returns the first load error encountered.
    pub async fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<SourceDocument>, LoadError> {
        futures::future::try_join_all(paths.iter().map(|path| self.load(path))).await
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

fn unreadable(path: &Path, source: io::Error) -> LoadError {
    let path = path.to_path_buf();
    match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound { path },
        _ => LoadError::Unreadable { path, source },
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Check that the catalog points at a `Pages` dictionary.
fn has_page_tree(doc: &Document) -> bool {
    let Ok(catalog) = doc.catalog() else {
        return false;
    };
    match catalog.get(b"Pages") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).is_ok(),
        Ok(Object::Dictionary(_)) => true,
        _ => false,
    }
}
