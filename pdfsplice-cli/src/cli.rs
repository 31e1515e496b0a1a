//! CLI argument parsing for pdfsplice.
//!
//! This module is also compiled by the build script to render the man page,
//! so it may only depend on `clap` and the `pdfsplice` library.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use pdfsplice::config::{CompressionLevel, Config, OverwriteMode};
use pdfsplice::error::{PdfSpliceError, Result};
use pdfsplice::selection::{PageSelection, parse_page_order};
use pdfsplice::transform::{Operation, TransformRequest};

/// Split, merge and reorder the pages of PDF documents.
///
/// Every operation writes a new file; inputs are never modified. Without
/// --output the result gets a generated name such as
/// `split_<id>.pdf` inside --output-dir.
#[derive(Parser, Debug)]
#[command(name = "pdfsplice")]
#[command(version)]
#[command(about = "Split, merge and reorder the pages of PDF documents", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,

    /// Output and reporting options shared by every subcommand.
    #[command(flatten)]
    pub options: OutputOptions,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remove pages from a document
    ///
    /// Page numbers start at 1. Numbers past the end of the document are
    /// ignored.
    ///
    /// Examples:
    ///   pdfsplice split report.pdf --remove 2,5-7
    ///   pdfsplice split scan.pdf -r 1 -o trimmed.pdf
    Split {
        /// Source document
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Pages to remove, e.g. "1,3-5"
        ///
        /// Comma-separated page numbers and ranges. A range must run
        /// forwards and span at least two pages.
        #[arg(short, long, value_name = "RANGES")]
        remove: String,
    },

    /// Append one document to another
    ///
    /// All pages of FIRST are followed by all pages of SECOND.
    ///
    /// Example:
    ///   pdfsplice merge cover.pdf body.pdf -o book.pdf
    Merge {
        /// Document whose pages come first
        #[arg(value_name = "FIRST")]
        first: PathBuf,

        /// Document whose pages come second
        #[arg(value_name = "SECOND")]
        second: PathBuf,
    },

    /// Rearrange the pages of a document
    ///
    /// Indices start at 0 and may repeat or be left out: "2,0,0" builds a
    /// three-page document from the third page and two copies of the first.
    ///
    /// Example:
    ///   pdfsplice reorder slides.pdf --order 3,2,1,0
    Reorder {
        /// Source document
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// New page order as 0-based indices, e.g. "2,0,1"
        #[arg(long, value_name = "INDICES")]
        order: String,
    },

    /// Show page count, PDF version and object count
    Info {
        /// Document to inspect
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct OutputOptions {
    /// Output PDF file path
    ///
    /// Use --force to overwrite existing files without confirmation.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Directory for generated output names
    #[arg(
        long,
        value_name = "DIR",
        env = "PDFSPLICE_OUTPUT_DIR",
        default_value = ".",
        global = true
    )]
    pub output_dir: PathBuf,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force", global = true)]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Verbose output, including debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print a JSON summary instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Compression level for output PDF
    ///
    /// - none: write streams as they are
    /// - standard: compress uncompressed streams (default)
    #[arg(short, long, value_name = "LEVEL", default_value = "standard", global = true)]
    #[arg(value_parser = ["none", "standard"])]
    pub compression: String,

    /// Refuse to write documents with more than N pages
    #[arg(long, value_name = "N", global = true)]
    pub max_pages: Option<usize>,
}

impl Command {
    /// Input documents named by the subcommand, in order.
    pub fn inputs(&self) -> Vec<PathBuf> {
        match self {
            Self::Split { input, .. } | Self::Reorder { input, .. } | Self::Info { input } => {
                vec![input.clone()]
            }
            Self::Merge { first, second } => vec![first.clone(), second.clone()],
        }
    }

    /// The transformation this subcommand performs, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Split { .. } => Some(Operation::Split),
            Self::Merge { .. } => Some(Operation::Merge),
            Self::Reorder { .. } => Some(Operation::Reorder),
            Self::Info { .. } => None,
        }
    }

    /// Parse the subcommand's page arguments into a request.
    ///
    /// # Errors
    ///
    /// - [`PdfSpliceError::InvalidPageRange`] for a bad `--remove` value
    /// - [`PdfSpliceError::InvalidPageOrder`] for a bad `--order` value
    /// - [`PdfSpliceError::InvalidConfig`] for `info`, which transforms nothing
    pub fn request(&self) -> Result<TransformRequest> {
        match self {
            Self::Split { remove, .. } => Ok(TransformRequest::RemovePages {
                selection: PageSelection::parse(remove)?,
            }),
            Self::Merge { .. } => Ok(TransformRequest::Merge),
            Self::Reorder { order, .. } => Ok(TransformRequest::Reorder {
                new_order: parse_page_order(order)?,
            }),
            Self::Info { .. } => Err(PdfSpliceError::invalid_config(
                "info does not transform documents",
            )),
        }
    }
}

impl OutputOptions {
    /// Resolve the overwrite flags.
    pub fn overwrite_mode(&self) -> OverwriteMode {
        if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        }
    }
}

impl TryFrom<&Cli> for Config {
    type Error = PdfSpliceError;

    /// Convert CLI arguments into a validated Config.
    fn try_from(cli: &Cli) -> Result<Self> {
        let options = &cli.options;
        let compression = CompressionLevel::from_str(&options.compression)?;

        let config = Config {
            inputs: cli.command.inputs(),
            output: options.output.clone(),
            output_dir: options.output_dir.clone(),
            overwrite_mode: options.overwrite_mode(),
            compression,
            quiet: options.quiet,
            verbose: options.verbose,
            json: options.json,
            max_output_pages: options.max_pages,
        };

        config.validate()?;
        Ok(config)
    }
}
