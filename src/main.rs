// src/main.rs
//
// wieldymarkup: compile WieldyMarkup templates to HTML
//
// - Every PATH is a file or a directory. Files are compiled whatever their extension;
//   directories are walked recursively and only files ending in `.<ext>` are compiled.
// - The HTML is written next to each source with an `.html` extension (or printed with
//   --stdout, in the order the sources were found).
// - Without --strict, documents that fail to compile are reported and skipped.
//
// CLI flags:
//   -c, --compress  : no indentation or line breaks between tags
//   -s, --strict    : stop at the first document that fails
//   --ext <EXT>     : source extension picked up in directories (default: txt)
//   --stdout        : print the HTML instead of writing files
//   -v, --verbose   : -v logs every compiled file, -vv also walk decisions
// RUST_LOG overrides the log level chosen by -v.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io::{self, Write};
use std::path::PathBuf;

use wieldymarkup::batch::{compile_paths, BatchOptions};

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Compress output: no indentation or newlines between tags
    #[arg(short, long, action = ArgAction::SetTrue)]
    compress: bool,

    /// Abort on the first document that fails to compile
    #[arg(short, long, action = ArgAction::SetTrue)]
    strict: bool,

    /// Extension of the sources compiled when walking directories
    #[arg(long, default_value = "txt")]
    ext: String,

    /// Print HTML to stdout instead of writing .html files
    #[arg(long, action = ArgAction::SetTrue)]
    stdout: bool,

    /// Increase logging verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Source files or directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let opts = BatchOptions {
        compress: cli.compress,
        strict: cli.strict,
        extension: cli.ext.trim_start_matches('.').to_string(),
        to_stdout: cli.stdout,
    };

    let report = compile_paths(cli.paths.as_slice(), &opts).context("compilation aborted")?;

    if opts.to_stdout {
        let mut out = io::stdout().lock();
        for doc in &report.compiled {
            out.write_all(doc.html.as_bytes())
                .context("failed to write to stdout")?;
        }
        out.flush().context("failed to write to stdout")?;
    }

    if report.compiled.is_empty() && report.is_clean() {
        log::warn!("no documents found");
    } else if !report.is_clean() {
        log::warn!(
            "{} compiled, {} skipped",
            report.compiled.len(),
            report.failed.len()
        );
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
