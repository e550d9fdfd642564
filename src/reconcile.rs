//! Classification of reference files against the target tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::canon::Ruleset;
use crate::error::ReconError;
use crate::scan::MeshScanner;
use crate::utils::{normalize_path, strip_suffix_ignore_ascii_case};

/// Outcome of one reconciliation run.
///
/// Both maps are keyed by reference-relative path; together they cover every
/// non-ignored reference file exactly once, and the key sets are disjoint.
#[derive(Debug, Default, Clone)]
pub struct Reconciliation {
    /// Reference files whose canonicalized counterpart exists in the target
    /// tree, mapped to that counterpart path.
    pub reconstructed: BTreeMap<String, PathBuf>,
    /// Reference files with no counterpart, mapped to their byte size.
    pub missing: BTreeMap<String, u64>,
}

impl Reconciliation {
    pub fn completed(&self) -> usize {
        self.reconstructed.len()
    }

    pub fn total(&self) -> usize {
        self.reconstructed.len() + self.missing.len()
    }

    /// Completion percentage, `None` when nothing was tracked. The distinction
    /// matters downstream: "no data" is not "0% complete".
    pub fn percent(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.reconstructed.len() as f64 * 100.0 / total as f64)
    }
}

/// Classify every reference file under the scanner's root as reconstructed
/// or missing.
///
/// The expected counterpart is the reference-relative path joined onto
/// `target_root`, with the mesh extension swapped for `design_extension` and
/// the whole candidate string canonicalized through `ruleset`. Existence of
/// that path is the entire test: content is never compared, so a stale or
/// empty counterpart still counts as reconstructed.
pub fn reconcile(
    scanner: &MeshScanner,
    target_root: &Path,
    ruleset: &Ruleset,
    design_extension: &str,
) -> Result<Reconciliation, ReconError> {
    let mesh_suffix = format!(".{}", scanner.mesh_extension());
    let mut outcome = Reconciliation::default();

    for file in scanner.scan()? {
        let file = file?;
        let candidate = normalize_path(&target_root.join(&file.relative_path).to_string_lossy());
        let stem = strip_suffix_ignore_ascii_case(&candidate, &mesh_suffix).ok_or_else(|| {
            ReconError::PathMapping {
                path: PathBuf::from(&candidate),
                expected: scanner.mesh_extension().to_string(),
            }
        })?;
        let mapped = ruleset.apply(&format!("{stem}.{design_extension}"));

        if Path::new(&mapped).exists() {
            debug!(reference = %file.relative_path, mapped = %mapped, "counterpart found");
            outcome.reconstructed.insert(file.relative_path, PathBuf::from(mapped));
        } else {
            let size = fs::metadata(&file.path)
                .map_err(|source| ReconError::Filesystem { path: file.path.clone(), source })?
                .len();
            outcome.missing.insert(file.relative_path, size);
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rule;
    use std::fs;
    use tempfile::TempDir;

    fn scanner_for(root: &Path) -> MeshScanner {
        MeshScanner::new(root.to_path_buf())
    }

    #[test]
    fn classifies_by_counterpart_existence() {
        let tmp = TempDir::new().expect("tmp");
        let reference = tmp.path().join("reference");
        let target = tmp.path().join("target");
        fs::create_dir_all(reference.join("STLs")).expect("mkdir reference");
        fs::create_dir_all(&target).expect("mkdir target");
        fs::write(reference.join("STLs/a.stl"), "0123456789").expect("write a");
        fs::write(reference.join("STLs/b.stl"), "01234567890123456789").expect("write b");
        fs::write(target.join("a.f3d"), "cad").expect("write a.f3d");

        let scanner = scanner_for(&reference).strip_prefix(Some("STLs".to_string()));
        let outcome =
            reconcile(&scanner, &target, &Ruleset::default(), "f3d").expect("reconcile");

        assert_eq!(outcome.reconstructed.len(), 1);
        assert_eq!(outcome.reconstructed["a.stl"], target.join("a.f3d"));
        assert_eq!(outcome.missing.len(), 1);
        assert_eq!(outcome.missing["b.stl"], 20);
        assert_eq!(outcome.percent(), Some(50.0));
    }

    #[test]
    fn mapped_path_reflects_canonicalization() {
        let tmp = TempDir::new().expect("tmp");
        let reference = tmp.path().join("reference");
        let target = tmp.path().join("target");
        fs::create_dir_all(&reference).expect("mkdir reference");
        fs::create_dir_all(&target).expect("mkdir target");
        fs::write(reference.join("part_b_variant.stl"), "mesh").expect("write");
        fs::write(target.join("part_a_variant.f3d"), "cad").expect("write");

        let ruleset = Ruleset::new(vec![Rule::new("_b_", "_a_")]);
        let outcome = reconcile(&scanner_for(&reference), &target, &ruleset, "f3d")
            .expect("reconcile");

        // The recorded counterpart is the post-canonicalization name.
        assert_eq!(outcome.reconstructed["part_b_variant.stl"], target.join("part_a_variant.f3d"));
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn classified_sets_cover_the_scan_and_are_disjoint() {
        let tmp = TempDir::new().expect("tmp");
        let reference = tmp.path().join("reference");
        let target = tmp.path().join("target");
        fs::create_dir_all(reference.join("sub")).expect("mkdir");
        fs::create_dir_all(&target).expect("mkdir target");
        for name in ["one.stl", "two.stl", "sub/three.stl"] {
            fs::write(reference.join(name), "mesh").expect("write");
        }
        fs::write(target.join("two.f3d"), "cad").expect("write");

        let scanner = scanner_for(&reference);
        let scanned: Vec<String> = scanner
            .scan()
            .expect("scan")
            .map(|f| f.expect("entry").relative_path)
            .collect();
        let outcome =
            reconcile(&scanner, &target, &Ruleset::default(), "f3d").expect("reconcile");

        let mut classified: Vec<String> = outcome
            .reconstructed
            .keys()
            .chain(outcome.missing.keys())
            .cloned()
            .collect();
        classified.sort();
        let mut expected = scanned;
        expected.sort();
        assert_eq!(classified, expected);
        assert!(outcome.reconstructed.keys().all(|k| !outcome.missing.contains_key(k)));
    }

    #[test]
    fn empty_reference_tree_yields_empty_maps() {
        let tmp = TempDir::new().expect("tmp");
        let reference = tmp.path().join("reference");
        let target = tmp.path().join("target");
        fs::create_dir_all(&reference).expect("mkdir");
        fs::create_dir_all(&target).expect("mkdir");

        let outcome = reconcile(&scanner_for(&reference), &target, &Ruleset::default(), "f3d")
            .expect("reconcile");
        assert_eq!(outcome.total(), 0);
        assert_eq!(outcome.percent(), None);
    }

    #[test]
    fn empty_counterpart_file_still_counts() {
        let tmp = TempDir::new().expect("tmp");
        let reference = tmp.path().join("reference");
        let target = tmp.path().join("target");
        fs::create_dir_all(&reference).expect("mkdir");
        fs::create_dir_all(&target).expect("mkdir");
        fs::write(reference.join("part.stl"), "mesh").expect("write");
        fs::write(target.join("part.f3d"), "").expect("write empty");

        let outcome = reconcile(&scanner_for(&reference), &target, &Ruleset::default(), "f3d")
            .expect("reconcile");
        assert_eq!(outcome.completed(), 1);
    }
}
