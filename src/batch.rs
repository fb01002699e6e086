//! Process every PNG of one iconset directory in turn

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use iconset_pixel::{process_file, Threshold};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("Cannot read directory {}: {}", .dir.display(), .source)]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Totals for one run. `processed` includes failed files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Regular files named `*.png` directly inside `dir`, not recursive.
///
/// Names are compared as raw bytes, so paths that are not valid UTF-8
/// are still found.
pub fn find_pngs(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let entries = std::fs::read_dir(dir).map_err(|source| BatchError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if !has_png_suffix(&entry.file_name()) {
            continue;
        }

        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else {
            log::debug!("Skipping {}: not a regular file", path.display());
        }
    }

    Ok(files)
}

fn has_png_suffix(name: &OsStr) -> bool {
    name.as_encoded_bytes().ends_with(b".png")
}

/// Run over `dir`, printing progress to stdout.
pub fn run(dir: &Path, threshold: Threshold) -> Result<BatchSummary, BatchError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(dir, threshold, &mut out)
}

/// Run over `dir`, writing progress lines to `out`.
///
/// A missing or unreadable directory is fatal. Per-file failures are
/// reported and counted, and the remaining files are still processed.
pub fn run_with_output<W: Write>(
    dir: &Path,
    threshold: Threshold,
    out: &mut W,
) -> Result<BatchSummary, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::MissingDirectory(dir.to_path_buf()));
    }

    let files = find_pngs(dir)?;
    writeln!(out, "Found {} icon file(s) in {}\n", files.len(), dir.display())?;

    let mut summary = BatchSummary::default();
    for path in &files {
        match process_file(path, threshold) {
            Ok(report) => {
                log::info!(
                    "{}: {}x{}, {} pixels cleared",
                    path.display(),
                    report.width,
                    report.height,
                    report.cleared
                );
                let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
                writeln!(out, "✓ Processed: {}", name)?;
            }
            Err(e) => {
                log::warn!("{}: {}", e.path().display(), e);
                writeln!(out, "✗ Failed {}: {}", e.path().display(), e)?;
                summary.failed += 1;
            }
        }
        summary.processed += 1;
    }

    writeln!(out, "\n✓ Processed {} icon file(s)", summary.processed)?;
    if summary.failed > 0 {
        writeln!(out, "✗ {} file(s) failed", summary.failed)?;
    }
    writeln!(out, "The .icns file can now be regenerated from the iconset")?;

    Ok(summary)
}
