// src/batch.rs
//
// File-system side of the compiler: read a source file, compile it, and write the HTML next to
// it (`page.txt` -> `page.html`). Directories are walked recursively and every file with the
// configured extension is compiled.
//
// Strict mode stops at the first failing document and returns its error. Otherwise failures are
// logged, collected in the report and the batch goes on.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

use crate::{CompileError, CompileOptions, Compiler};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub compress: bool,
    /// Abort the whole batch on the first error.
    pub strict: bool,
    /// Extension (without the dot) of the sources picked up in directories.
    pub extension: String,
    /// Keep the HTML in the report instead of writing `.html` files.
    pub to_stdout: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            compress: false,
            strict: false,
            extension: "txt".to_string(),
            to_stdout: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: CompileError,
    },

    #[error("refusing to overwrite source {} with its own output", path.display())]
    OutputIsSource { path: PathBuf },

    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),
}

/// One successfully compiled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub source: PathBuf,
    /// Where the HTML was written; `None` when it was kept for stdout.
    pub output: Option<PathBuf>,
    pub html: String,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub compiled: Vec<Compiled>,
    /// Documents skipped in non-strict mode.
    pub failed: Vec<BatchError>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// `dir/page.txt` -> `dir/page.html`.
pub fn output_path(source: &Path) -> PathBuf {
    source.with_extension("html")
}

/// Compiles one file and, unless `to_stdout`, writes its `.html` sibling.
pub fn compile_file(path: &Path, opts: &BatchOptions) -> Result<Compiled, BatchError> {
    let source = fs::read_to_string(path).map_err(|source| BatchError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let compiler = Compiler::new(CompileOptions {
        compress: opts.compress,
    });
    let html = compiler
        .compile(&source)
        .map_err(|source| BatchError::Compile {
            path: path.to_path_buf(),
            source,
        })?;

    if opts.to_stdout {
        return Ok(Compiled {
            source: path.to_path_buf(),
            output: None,
            html,
        });
    }

    let out_path = output_path(path);
    if out_path == path {
        return Err(BatchError::OutputIsSource {
            path: path.to_path_buf(),
        });
    }
    fs::write(&out_path, &html).map_err(|source| BatchError::Write {
        path: out_path.clone(),
        source,
    })?;
    log::info!("compiled {} -> {}", path.display(), out_path.display());

    Ok(Compiled {
        source: path.to_path_buf(),
        output: Some(out_path),
        html,
    })
}

/// Compiles every file named in `paths` and every matching file under the named directories.
pub fn compile_paths<P: AsRef<Path>>(
    paths: &[P],
    opts: &BatchOptions,
) -> Result<BatchReport, BatchError> {
    let mut report = BatchReport::default();

    for path in paths {
        let path = path.as_ref();
        let sources = if path.is_dir() {
            walk(path, opts, &mut report)?
        } else {
            vec![path.to_path_buf()]
        };

        for source in sources {
            match compile_file(&source, opts) {
                Ok(done) => report.compiled.push(done),
                Err(err) => skip_or_abort(err, opts, &mut report)?,
            }
        }
    }

    Ok(report)
}

fn walk(
    dir: &Path,
    opts: &BatchOptions,
    report: &mut BatchReport,
) -> Result<Vec<PathBuf>, BatchError> {
    log::debug!("walking {}", dir.display());
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut sources = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                skip_or_abort(err.into(), opts, report)?;
                continue;
            }
        };
        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        if is_file && has_extension(entry.path(), &opts.extension) {
            sources.push(entry.into_path());
        } else if is_file {
            log::debug!("ignoring {}", entry.path().display());
        }
    }
    Ok(sources)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn skip_or_abort(
    err: BatchError,
    opts: &BatchOptions,
    report: &mut BatchReport,
) -> Result<(), BatchError> {
    if opts.strict {
        return Err(err);
    }
    log::warn!("skipping: {err}");
    report.failed.push(err);
    Ok(())
}
