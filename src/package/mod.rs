//! ZIP packaging of output files.
//!
//! Entries are stored under their base names only, so the archive layout is
//! flat regardless of where the inputs live on disk.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors that can occur while building an archive.
#[derive(Debug, Error)]
pub enum PackageError {
    /// Reading an input or writing the archive file failed.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path where the error occurred.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The ZIP writer rejected an entry or failed to finalize.
    #[error("failed to write archive {path}: {source}")]
    Zip {
        /// Archive being written.
        path: PathBuf,
        /// Underlying ZIP error.
        #[source]
        source: zip::result::ZipError,
    },

    /// An input path has no file name component.
    #[error("input has no file name: {path}")]
    NoFileName {
        /// The offending input path.
        path: PathBuf,
    },
}

impl PackageError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }
}

/// Result of a packaging request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// The archive was written with these entry names, in order.
    Created {
        /// Archive location.
        path: PathBuf,
        /// Entry names stored in the archive.
        entries: Vec<String>,
    },
    /// No inputs were given; no archive was written.
    SkippedEmpty,
}

/// Writes `files` into a new ZIP archive at `zip_path`.
///
/// The archive is built next to `zip_path` and renamed into place, so an
/// existing archive is replaced only on success. When two inputs share a
/// base name the first is kept and later ones are skipped with a warning.
/// An empty input list writes nothing and returns
/// [`PackageOutcome::SkippedEmpty`].
///
/// # Errors
///
/// Returns `PackageError` if an input cannot be read, an input has no file
/// name, or the archive cannot be written.
pub fn create_zip<P: AsRef<Path>>(
    files: &[P],
    zip_path: &Path,
) -> Result<PackageOutcome, PackageError> {
    if files.is_empty() {
        warn!(archive = %zip_path.display(), "nothing to package, archive not created");
        return Ok(PackageOutcome::SkippedEmpty);
    }

    if let Some(parent) = zip_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| PackageError::io(parent, e))?;
    }

    let partial = partial_path(zip_path);
    let entries = match write_archive(files, &partial, zip_path) {
        Ok(entries) => entries,
        Err(e) => {
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }
    };
    std::fs::rename(&partial, zip_path).map_err(|e| PackageError::io(zip_path, e))?;

    info!(archive = %zip_path.display(), entries = entries.len(), "archive created");
    Ok(PackageOutcome::Created {
        path: zip_path.to_path_buf(),
        entries,
    })
}

/// Sibling path the archive is built at before being moved into place.
fn partial_path(zip_path: &Path) -> PathBuf {
    let mut name = zip_path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    zip_path.with_file_name(name)
}

fn write_archive<P: AsRef<Path>>(
    files: &[P],
    partial: &Path,
    zip_path: &Path,
) -> Result<Vec<String>, PackageError> {
    let archive = File::create(partial).map_err(|e| PackageError::io(partial, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(archive));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        let file = file.as_ref();
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PackageError::NoFileName {
                path: file.to_path_buf(),
            })?;
        if !seen.insert(name.clone()) {
            warn!(path = %file.display(), entry = %name, "duplicate entry name, skipping");
            continue;
        }

        let mut input = File::open(file).map_err(|e| PackageError::io(file, e))?;
        zip.start_file(name.as_str(), options)
            .map_err(|e| PackageError::zip(zip_path, e))?;
        io::copy(&mut input, &mut zip).map_err(|e| PackageError::io(file, e))?;
        entries.push(name);
    }

    let writer = zip.finish().map_err(|e| PackageError::zip(zip_path, e))?;
    writer
        .into_inner()
        .map_err(|e| PackageError::io(partial, e.into_error()))?;
    Ok(entries)
}
