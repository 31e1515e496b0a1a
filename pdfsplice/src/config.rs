//! Runtime configuration.
//!
//! Front ends turn their arguments into a [`Config`] and call
//! [`Config::validate`] before running an operation. Configuration covers
//! where and how the result is written; what to do to the pages is carried
//! separately by a [`TransformRequest`](crate::transform::TransformRequest).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PdfSpliceError, Result};
use crate::io::WriteOptions;

/// Compression applied to the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Write streams as they are.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
}

impl CompressionLevel {
    /// Check if streams should be compressed.
    pub fn compresses(&self) -> bool {
        matches!(self, Self::Standard)
    }
}

impl FromStr for CompressionLevel {
    type Err = PdfSpliceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            _ => Err(PdfSpliceError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard"
            ))),
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Standard => f.write_str("standard"),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Settings for one run, derived from front-end arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source documents, in argument order.
    pub inputs: Vec<PathBuf>,

    /// Explicit output path. When unset, a generated name is placed in
    /// `output_dir`.
    pub output: Option<PathBuf>,

    /// Directory for generated output names.
    pub output_dir: PathBuf,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Print machine-readable summaries instead of text.
    pub json: bool,

    /// Refuse to produce documents with more pages than this.
    pub max_output_pages: Option<usize>,
}

impl Config {
    /// Create a configuration for `inputs` with every other setting at its default.
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            output: None,
            output_dir: PathBuf::from("."),
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            quiet: false,
            verbose: false,
            json: false,
            max_output_pages: None,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSpliceError::InvalidConfig`] if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The page ceiling is zero
    /// - The output path is one of the inputs
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(PdfSpliceError::invalid_config("No input files specified"));
        }

        if self.verbose && self.quiet {
            return Err(PdfSpliceError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if self.max_output_pages == Some(0) {
            return Err(PdfSpliceError::invalid_config(
                "Maximum output pages must be at least 1",
            ));
        }

        if let Some(output) = &self.output
            && self.inputs.iter().any(|input| same_file(input, output))
        {
            return Err(PdfSpliceError::invalid_config(format!(
                "Output file cannot be the same as an input file: {}",
                output.display()
            )));
        }

        Ok(())
    }

    /// Where the result goes: the explicit output, or `suggested_name` inside
    /// the output directory.
    pub fn output_path(&self, suggested_name: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.output_dir.join(suggested_name))
    }

    /// Writer options for this configuration.
    ///
    /// Only [`OverwriteMode::Force`] lets the writer replace a file; a prompt
    /// must be answered (and the mode upgraded) by the front end first.
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            compress: self.compression.compresses(),
            overwrite: self.overwrite_mode == OverwriteMode::Force,
            ..WriteOptions::default()
        }
    }

    /// Check if text output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
