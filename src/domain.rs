//! Core types and built-in defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::canon::Ruleset;
use crate::error::ReconError;

/// Schema version stamped into JSON reports.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A mesh file discovered under a reference tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the scan root, forward-slash separated, with any
    /// configured sub-root prefix trimmed. Unique key within one run.
    pub relative_path: String,
}

/// A single literal substring rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rule {
    pub find: String,
    pub replace: String,
}

impl Rule {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self { find: find.into(), replace: replace.into() }
    }
}

/// One tracked upstream repository.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSpec {
    /// GitHub slug, e.g. `VoronDesign/Voron-2`. Used when linking back to
    /// upstream mesh files.
    pub github: String,
    /// Sub-root under which the upstream keeps its mesh files; trimmed from
    /// relative paths before reconciliation.
    #[serde(default)]
    pub strip_prefix: Option<String>,
    /// Branch used in upstream file links.
    pub branch: String,
}

/// Tracker configuration: which repositories to reconcile and how naming
/// divergences between the two trees are bridged.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Extension of the reference files being tracked.
    #[serde(default = "default_mesh_extension")]
    pub mesh_extension: String,
    /// Extension of the design files expected in the target tree.
    #[serde(default = "default_design_extension")]
    pub design_extension: String,
    /// Reference paths containing any of these substrings are excluded from
    /// the scan entirely.
    #[serde(default = "default_ignore_substrings")]
    pub ignore_substrings: Vec<String>,
    /// Ordered canonicalization rules. Order is significant: each rule sees
    /// the output of the previous one.
    #[serde(default = "default_rules")]
    pub rules: Vec<Rule>,
    /// Tracked repositories by name.
    #[serde(default = "default_repos")]
    pub repos: BTreeMap<String, RepoSpec>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            mesh_extension: default_mesh_extension(),
            design_extension: default_design_extension(),
            ignore_substrings: default_ignore_substrings(),
            rules: default_rules(),
            repos: default_repos(),
        }
    }
}

impl TrackerConfig {
    /// Look up a repository by its configured name. Selection is always
    /// explicit; an unmatched name is an error, never a guess.
    pub fn repo(&self, name: &str) -> Result<&RepoSpec, ReconError> {
        self.repos.get(name).ok_or_else(|| ReconError::UnknownRepo { name: name.to_string() })
    }

    pub fn ruleset(&self) -> Ruleset {
        Ruleset::new(self.rules.clone())
    }
}

pub fn default_mesh_extension() -> String {
    "stl".to_string()
}

pub fn default_design_extension() -> String {
    "f3d".to_string()
}

pub fn default_ignore_substrings() -> Vec<String> {
    ["Legacy_Brackets", "Slice_Mosquito", "Slice Mosquito", "Mosquito_Toolhead"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Built-in canonicalization rules bridging known naming divergences:
/// revision suffixes, interchangeable hardware sizes, and mirrored parts
/// reconstructible from one side.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new("_b_", "_a_"),
        Rule::new("midspan_panel_clip_6mm_x3", "midspan_panel_clip_3mm_x12"),
        Rule::new("corner_panel_clip_6mm_x4", "corner_panel_clip_3mm_x12"),
        Rule::new("tensioner_right", "tensioner_left"),
        Rule::new("z_tensioner_x4_9mm", "z_tensioner_x4_6mm"),
    ]
}

pub fn default_repos() -> BTreeMap<String, RepoSpec> {
    BTreeMap::from([
        (
            "Voron-2".to_string(),
            RepoSpec {
                github: "VoronDesign/Voron-2".to_string(),
                strip_prefix: Some("STLs".to_string()),
                branch: "Voron2.4".to_string(),
            },
        ),
        (
            "Voron-Trident".to_string(),
            RepoSpec {
                github: "VoronDesign/Voron-Trident".to_string(),
                strip_prefix: Some("STLs".to_string()),
                branch: "main".to_string(),
            },
        ),
        (
            "Voron-0".to_string(),
            RepoSpec {
                github: "VoronDesign/Voron-0".to_string(),
                strip_prefix: Some("STLs".to_string()),
                branch: "Voron0.1".to_string(),
            },
        ),
    ])
}
