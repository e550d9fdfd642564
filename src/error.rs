//! Error taxonomy for the reconciliation core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the reconciliation core.
///
/// Every variant is fatal: there are no retries and no partial reports.
/// Either the full classification and aggregation completes, or the run
/// aborts with one of these.
#[derive(Debug, Error)]
pub enum ReconError {
    /// A required root path or config value is absent.
    #[error("missing required configuration: {0}")]
    Configuration(String),

    /// A tree root is missing, or a filesystem read failed mid-walk.
    #[error("cannot read {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A reference path fell outside the expected extension scheme. This is a
    /// programming-contract violation, not an input problem.
    #[error("reference path {} does not end in .{expected}", path.display())]
    PathMapping { path: PathBuf, expected: String },

    /// A repository was selected by name but no configuration entry matches.
    #[error("no repository named '{name}' is configured")]
    UnknownRepo { name: String },
}
