//! Writing assembled documents to disk.
//!
//! Writes are atomic by default: the document is serialized into a hidden
//! temporary file next to the target and renamed into place once flushed.
//! If anything fails the temporary file is removed.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lopdf::Document;
use tokio::task;
use tracing::debug;
use uuid::Uuid;

use crate::error::WriteError;

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress content streams before writing.
    pub compress: bool,

    /// Renumber objects into a dense id range.
    pub optimize: bool,

    /// Replace an existing file at the target path.
    pub overwrite: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: true,
            overwrite: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether compression was applied.
    pub compressed: bool,

    /// Whether objects were renumbered.
    pub optimized: bool,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        super::format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// The options this writer uses.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Save a PDF document to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target exists and overwriting is off
    /// - The output (or temporary) file cannot be created
    /// - Serialization, flushing or the final rename fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfsplice::io::PdfWriter;
    /// # use lopdf::Document;
    /// # use std::path::Path;
    /// # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
    /// let stats = PdfWriter::new().save(&doc, Path::new("output.pdf")).await?;
    /// println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn save(&self, doc: &Document, path: &Path) -> Result<WriteStatistics, WriteError> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();
        let doc = doc.clone();

        let stats = task::spawn_blocking(move || write_document(doc, path_buf, &options))
            .await
            .map_err(|e| WriteError::Task(e.to_string()))??;

        debug!(
            path = %stats.output_path.display(),
            bytes = stats.file_size,
            elapsed_ms = stats.write_time.as_millis() as u64,
            "wrote output document"
        );
        Ok(stats)
    }

    /// Check that the target's parent directory exists and is writable.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::CreateOutput`] describing the parent directory.
    pub async fn can_write(&self, path: &Path) -> Result<(), WriteError> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let metadata = tokio::fs::metadata(parent)
            .await
            .map_err(|source| WriteError::CreateOutput {
                path: parent.to_path_buf(),
                source,
            })?;

        if !metadata.is_dir() || metadata.permissions().readonly() {
            return Err(WriteError::CreateOutput {
                path: parent.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "not a writable directory",
                ),
            });
        }
        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

fn write_document(
    mut doc: Document,
    path: PathBuf,
    options: &WriteOptions,
) -> Result<WriteStatistics, WriteError> {
    let start = Instant::now();

    if !options.overwrite && path.exists() {
        return Err(WriteError::OutputExists { path });
    }

    if options.compress {
        doc.compress();
    }
    if options.optimize {
        doc.renumber_objects();
    }

    if options.atomic {
        let temp = TempOutput::new(&path);
        serialize(&mut doc, temp.file()?, &temp.path, options.buffer_size)?;
        temp.persist(&path, options.overwrite)?;
    } else {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .create_new(!options.overwrite)
            .open(&path)
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::AlreadyExists => WriteError::OutputExists { path: path.clone() },
                _ => WriteError::CreateOutput {
                    path: path.clone(),
                    source,
                },
            })?;
        serialize(&mut doc, file, &path, options.buffer_size)?;
    }

    let file_size = match fs::metadata(&path) {
        Ok(metadata) => metadata.len(),
        Err(error) => {
            debug!(path = %path.display(), %error, "could not read output size");
            0
        }
    };

    Ok(WriteStatistics {
        write_time: start.elapsed(),
        file_size,
        output_path: path,
        compressed: options.compress,
        optimized: options.optimize,
    })
}

fn serialize(
    doc: &mut Document,
    file: File,
    path: &Path,
    buffer_size: usize,
) -> Result<(), WriteError> {
    let mut writer = BufWriter::with_capacity(buffer_size, file);
    doc.save_to(&mut writer)
        .map_err(|e| WriteError::Serialize {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    writer.flush().map_err(|source| WriteError::Flush {
        path: path.to_path_buf(),
        source,
    })?;
    writer
        .into_inner()
        .map_err(|e| WriteError::Flush {
            path: path.to_path_buf(),
            source: e.into_error(),
        })?
        .sync_all()
        .map_err(|source| WriteError::Flush {
            path: path.to_path_buf(),
            source,
        })
}

/// A temporary sibling of the output path, removed on drop unless persisted.
struct TempOutput {
    path: PathBuf,
    persisted: bool,
}

impl TempOutput {
    fn new(target: &Path) -> Self {
        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output.pdf".to_string());
        let temp_name = format!(".{file_name}.{}.tmp", Uuid::new_v4().simple());
        Self {
            path: target.with_file_name(temp_name),
            persisted: false,
        }
    }

    fn file(&self) -> Result<File, WriteError> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|source| WriteError::CreateOutput {
                path: self.path.clone(),
                source,
            })
    }

    fn persist(mut self, target: &Path, overwrite: bool) -> Result<(), WriteError> {
        if !overwrite && target.exists() {
            return Err(WriteError::OutputExists {
                path: target.to_path_buf(),
            });
        }
        fs::rename(&self.path, target).map_err(|source| WriteError::Persist {
            path: target.to_path_buf(),
            source,
        })?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for TempOutput {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = fs::remove_file(&self.path);
        }
    }
}
