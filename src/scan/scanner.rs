//! Recursive enumeration of mesh files under a reference tree.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::domain::{default_mesh_extension, ReferenceFile};
use crate::error::ReconError;
use crate::utils::normalize_path;

/// Scanner for mesh files under a reference tree root.
///
/// Yields root-relative, forward-slash paths with a configurable sub-root
/// trimmed and a configurable ignore-list applied. Paths containing an
/// ignore substring are dropped entirely and never reach classification.
#[derive(Debug, Clone)]
pub struct MeshScanner {
    root: PathBuf,
    extension: String,
    strip_prefix: Option<String>,
    ignore_substrings: Vec<String>,
}

impl MeshScanner {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extension: default_mesh_extension(),
            strip_prefix: None,
            ignore_substrings: Vec::new(),
        }
    }

    /// Set the file extension to enumerate (without the leading dot).
    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    /// Set the sub-root prefix to trim from relative paths.
    pub fn strip_prefix(mut self, prefix: Option<String>) -> Self {
        self.strip_prefix = prefix;
        self
    }

    /// Set the substrings that exclude a relative path from the scan.
    pub fn ignore_substrings(mut self, substrings: Vec<String>) -> Self {
        self.ignore_substrings = substrings;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mesh_extension(&self) -> &str {
        &self.extension
    }

    /// Start a walk over the reference tree.
    ///
    /// The returned iterator is lazy and one-shot; calling `scan` again
    /// performs a fresh filesystem walk, since the tree may have changed.
    /// A missing root fails immediately.
    pub fn scan(&self) -> Result<ScanIter<'_>, ReconError> {
        if !self.root.is_dir() {
            return Err(ReconError::Filesystem {
                path: self.root.clone(),
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    "reference root is not a directory",
                ),
            });
        }
        Ok(ScanIter {
            walker: WalkDir::new(&self.root).sort_by_file_name().into_iter(),
            scanner: self,
        })
    }
}

/// Lazy, one-shot sequence of reference files produced by [`MeshScanner::scan`].
pub struct ScanIter<'a> {
    walker: walkdir::IntoIter,
    scanner: &'a MeshScanner,
}

impl Iterator for ScanIter<'_> {
    type Item = Result<ReferenceFile, ReconError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.scanner.root.clone());
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk failed"));
                    return Some(Err(ReconError::Filesystem { path, source }));
                }
            };

            if entry.path().is_dir() {
                continue;
            }

            let matches = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.scanner.extension));
            if !matches {
                continue;
            }

            let relative = match entry.path().strip_prefix(&self.scanner.root) {
                Ok(rel) => normalize_path(&rel.to_string_lossy()),
                Err(_) => continue,
            };

            let relative = match &self.scanner.strip_prefix {
                Some(prefix) => relative
                    .strip_prefix(&format!("{prefix}/"))
                    .map(str::to_string)
                    .unwrap_or(relative),
                None => relative,
            };

            if self.scanner.ignore_substrings.iter().any(|s| relative.contains(s.as_str())) {
                debug!(path = %relative, "ignoring reference file");
                continue;
            }

            return Some(Ok(ReferenceFile { path: entry.into_path(), relative_path: relative }));
        }
    }
}
