//! Report rendering.
//!
//! Every renderer writes to an explicit sink supplied by the caller; nothing
//! here owns or swaps a process-wide output stream.

pub mod markdown;
pub mod plain;
pub mod readme;
pub mod report;

use crate::aggregate::DirectoryTree;
use crate::domain::RepoSpec;
use crate::reconcile::Reconciliation;

/// Everything a renderer needs to know about one tracked repository.
pub struct RepoSection<'a> {
    pub name: &'a str,
    pub spec: &'a RepoSpec,
    pub outcome: &'a Reconciliation,
    pub tree: &'a DirectoryTree,
    pub mesh_extension: &'a str,
    pub design_extension: &'a str,
}
