//! Duplicate mesh detection by content hash.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::Path;

use rayon::prelude::*;

use crate::error::ReconError;
use crate::scan::MeshScanner;
use crate::utils::{file_digest, normalize_path};

/// Group every mesh file under `root` by content digest.
///
/// Scans the full tree: duplicate detection deliberately skips the sub-root
/// trimming and ignore-list used for reconciliation.
pub fn find_duplicates(
    root: &Path,
    mesh_extension: &str,
) -> Result<BTreeMap<String, BTreeSet<String>>, ReconError> {
    let scanner = MeshScanner::new(root.to_path_buf()).extension(mesh_extension);
    let files = scanner.scan()?.collect::<Result<Vec<_>, _>>()?;

    let digests = files
        .par_iter()
        .map(|file| {
            let digest = file_digest(&file.path)?;
            Ok((digest, normalize_path(&file.path.to_string_lossy())))
        })
        .collect::<Result<Vec<(String, String)>, ReconError>>()?;

    let mut by_digest: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (digest, path) in digests {
        by_digest.entry(digest).or_default().insert(path);
    }
    Ok(by_digest)
}

/// Print every group of identical files as a blank-line-separated block of
/// sorted paths. Singleton groups are skipped.
pub fn render_groups(
    out: &mut dyn Write,
    by_digest: &BTreeMap<String, BTreeSet<String>>,
) -> io::Result<()> {
    for files in by_digest.values() {
        if files.len() < 2 {
            continue;
        }
        for file in files {
            writeln!(out, "{file}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
