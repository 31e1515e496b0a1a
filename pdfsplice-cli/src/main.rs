//! pdfsplice - Split, merge and reorder the pages of PDF documents.

mod cli;
mod output;

use std::io::{self, Write};
use std::process;

use clap::Parser;
use pdfsplice::config::{Config, OverwriteMode};
use pdfsplice::engine::Engine;
use pdfsplice::error::{PdfSpliceError, WriteError};
use pdfsplice::notice::Notice;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::output::OutputFormatter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.options.verbose);

    let json = cli.options.json;
    let operation = cli.command.operation();

    if let Err(err) = run(cli).await {
        if json {
            let notice = Notice::for_error(operation, &err);
            println!("{}", json!({ "error": err.to_string(), "notice": notice }));
        } else {
            OutputFormatter::quiet().error(&format!("Error: {err}"));
        }
        process::exit(err.exit_code());
    }
}

/// Diagnostics go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfSpliceError> {
    let mut config = Config::try_from(&cli)?;
    let formatter = OutputFormatter::from_config(&config);
    let engine = Engine::from_config(&config);

    if let Command::Info { .. } = cli.command {
        return show_info(&engine, &config, &formatter).await;
    }

    let request = cli.command.request()?;
    let operation = request.operation();
    debug!(%operation, inputs = config.inputs.len(), "parsed request");

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfsplice::NAME, pdfsplice::VERSION));
        formatter.blank_line();
        formatter.info(&format!("Running {operation} on:"));
        for (index, input) in config.inputs.iter().enumerate() {
            formatter.list_item(index + 1, &input.display().to_string());
        }
        formatter.blank_line();
    }

    handle_output_overwrite(&mut config, &formatter)?;

    let artifact = engine.execute(&config, &request).await?;

    if config.json {
        let summary = serde_json::to_string_pretty(&artifact).map_err(io::Error::from)?;
        println!("{summary}");
    } else {
        formatter.artifact(&artifact);
    }

    Ok(())
}

/// Print page count, version and object count of each input.
async fn show_info(
    engine: &Engine,
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), PdfSpliceError> {
    let sources = engine.load_all(&config.inputs).await?;

    for source in &sources {
        if config.json {
            let info = json!({
                "name": source.original_name(),
                "pageCount": source.page_count(),
                "version": source.version(),
                "objectCount": source.object_count(),
            });
            println!("{info}");
        } else {
            formatter.document_info(source);
        }
    }
    Ok(())
}

/// Resolve an existing explicit output path before any work is done.
///
/// A confirmed prompt upgrades the config to [`OverwriteMode::Force`].
fn handle_output_overwrite(
    config: &mut Config,
    formatter: &OutputFormatter,
) -> Result<(), PdfSpliceError> {
    let Some(output) = config.output.clone() else {
        return Ok(());
    };
    if !output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(WriteError::OutputExists { path: output }.into()),
        OverwriteMode::Prompt => {
            // Quiet and JSON runs cannot ask.
            if formatter.is_quiet() {
                return Err(WriteError::OutputExists { path: output }.into());
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                output.display()
            ));
            print!("Overwrite? [y/N]: ");
            io::stdout().flush()?;

            let mut response = String::new();
            io::stdin().read_line(&mut response)?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                config.overwrite_mode = OverwriteMode::Force;
                Ok(())
            } else {
                Err(PdfSpliceError::Cancelled)
            }
        }
    }
}
