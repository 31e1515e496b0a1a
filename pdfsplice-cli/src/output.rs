//! Message formatting and display.
//!
//! Text output for humans. JSON summaries are printed by the caller; a
//! formatter built from a `--json` config prints nothing but errors.

use std::io::{self, IsTerminal};

use pdfsplice::config::Config;
use pdfsplice::document::SourceDocument;
use pdfsplice::engine::SavedArtifact;
use pdfsplice::io::format_file_size;
use pdfsplice::notice::{Notice, Severity};

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
}

impl MessageLevel {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
            Self::Error => "\x1b[31m",
        }
    }
}

impl From<Severity> for MessageLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info => Self::Info,
            Severity::Success => Self::Success,
            Severity::Warning => Self::Warning,
            Severity::Error => Self::Error,
        }
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from configuration.
    ///
    /// JSON mode is treated as quiet so stdout stays machine-readable.
    pub fn from_config(config: &Config) -> Self {
        Self::new(!config.should_print(), config.verbose)
    }

    /// Create a quiet formatter (only warnings and errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    fn should_use_color() -> bool {
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message to stderr, even in quiet mode.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message to stderr.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Render a notice at its severity.
    pub fn notice(&self, notice: &Notice) {
        let message = match notice.operation {
            Some(operation) => format!("{operation}: {}", notice.code.summary()),
            None => notice.code.summary().to_string(),
        };
        match MessageLevel::from(notice.severity) {
            MessageLevel::Info => self.info(&message),
            MessageLevel::Success => self.success(&message),
            MessageLevel::Warning => self.warning(&message),
            MessageLevel::Error => self.error(&message),
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        let prefix = level.prefix();
        let color_code = level.color_code();
        let line = if self.colored && !color_code.is_empty() {
            format!("{color_code}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        };

        match level {
            MessageLevel::Warning | MessageLevel::Error => eprintln!("{line}"),
            MessageLevel::Info | MessageLevel::Success => println!("{line}"),
        }
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a labelled value. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print a blank line. Suppressed in quiet mode.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Print a list item. Suppressed in quiet mode.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// Report a written artifact and its notices.
    pub fn artifact(&self, artifact: &SavedArtifact) {
        for notice in &artifact.notices {
            self.notice(notice);
        }
        self.success(&format!(
            "Wrote {} page(s) to {} ({})",
            artifact.page_count,
            artifact.path.display(),
            format_file_size(artifact.file_size)
        ));

        if self.verbose {
            self.section("Statistics");
            for (index, source) in artifact.sources.iter().enumerate() {
                self.detail(&format!("Source {}", index + 1), source);
            }
            self.detail("Pages", &artifact.page_count.to_string());
            self.detail("Output size", &format_file_size(artifact.file_size));
            self.detail(
                "Compression",
                if artifact.compressed { "Yes" } else { "No" },
            );
        }
    }

    /// Describe a loaded document.
    pub fn document_info(&self, source: &SourceDocument) {
        if self.quiet {
            return;
        }
        println!("{}", source.original_name());
        println!("  Pages: {}", source.page_count());
        println!("  PDF version: {}", source.version());
        println!("  Objects: {}", source.object_count());
    }

    /// Check if output should be shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}
