//! Dupes command implementation

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use crate::config::load_config;
use crate::dupes::{find_duplicates, render_groups};

#[derive(Args)]
pub struct DupesArgs {
    /// Directory containing the reference repositories
    #[arg(long, value_name = "DIR")]
    pub root: PathBuf,

    /// Repository to scan (repeatable; default: all configured)
    #[arg(long = "repo", value_name = "NAME")]
    pub repos: Vec<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn run(args: DupesArgs) -> Result<()> {
    let config = load_config(Path::new("."), args.config.as_deref())?;

    let selected: Vec<String> = if args.repos.is_empty() {
        config.repos.keys().cloned().collect()
    } else {
        args.repos.clone()
    };

    // Duplicates are grouped across every selected tree, so a file mirrored
    // between two repositories is reported too.
    let mut by_digest: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for name in &selected {
        config.repo(name)?;
        let groups = find_duplicates(&args.root.join(name), &config.mesh_extension)?;
        for (digest, files) in groups {
            by_digest.entry(digest).or_default().extend(files);
        }
    }

    render_groups(&mut std::io::stdout().lock(), &by_digest)?;
    Ok(())
}
