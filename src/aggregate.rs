//! Directory-prefix completion aggregation.

use std::collections::{BTreeMap, BTreeSet};

use crate::reconcile::Reconciliation;

/// Completion counts for one directory prefix.
///
/// The aggregate sets hold every classified leaf under the prefix, direct or
/// nested; the leaf subsets hold only the files whose immediate parent is
/// this prefix, so reports can list them separately from subtree counts.
#[derive(Debug, Default, Clone)]
pub struct DirectoryNode {
    pub reconstructed: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub reconstructed_leaves: BTreeSet<String>,
    pub missing_leaves: BTreeSet<String>,
}

impl DirectoryNode {
    pub fn completed(&self) -> usize {
        self.reconstructed.len()
    }

    pub fn total(&self) -> usize {
        self.reconstructed.len() + self.missing.len()
    }

    /// Rounded completion percentage. Every node holds at least one leaf
    /// (no path passes through an empty directory), so the division is
    /// always defined.
    pub fn percent(&self) -> u32 {
        (self.completed() as f64 * 100.0 / self.total() as f64).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Direct leaves in lexicographic order, reconstructed and missing merged.
    pub fn leaves(&self) -> impl Iterator<Item = &String> + '_ {
        self.reconstructed_leaves.union(&self.missing_leaves)
    }
}

/// Directory-prefix tree over one reconciliation outcome. Iteration is
/// lexicographic ascending on prefix, the only ordering reports rely on.
#[derive(Debug, Default, Clone)]
pub struct DirectoryTree {
    nodes: BTreeMap<String, DirectoryNode>,
}

impl DirectoryTree {
    pub fn nodes(&self) -> impl Iterator<Item = (&String, &DirectoryNode)> + '_ {
        self.nodes.iter()
    }

    pub fn get(&self, prefix: &str) -> Option<&DirectoryNode> {
        self.nodes.get(prefix)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Build the prefix tree by inserting every classified path's full prefix
/// chain, longest prefix first down to length one. A file directly under the
/// tree root registers under the empty prefix.
pub fn aggregate(outcome: &Reconciliation) -> DirectoryTree {
    let mut nodes: BTreeMap<String, DirectoryNode> = BTreeMap::new();

    let classified = outcome
        .reconstructed
        .keys()
        .map(|path| (path, true))
        .chain(outcome.missing.keys().map(|path| (path, false)));

    for (path, is_reconstructed) in classified {
        let parent = path.rsplit_once('/').map_or("", |(dir, _)| dir);
        let segments: Vec<&str> = parent.split('/').collect();
        for len in (1..=segments.len()).rev() {
            let prefix = segments[..len].join("/");
            let is_leaf_parent = len == segments.len();
            let node = nodes.entry(prefix).or_default();
            if is_reconstructed {
                node.reconstructed.insert(path.clone());
                if is_leaf_parent {
                    node.reconstructed_leaves.insert(path.clone());
                }
            } else {
                node.missing.insert(path.clone());
                if is_leaf_parent {
                    node.missing_leaves.insert(path.clone());
                }
            }
        }
    }

    DirectoryTree { nodes }
}
