//! Report command implementation

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use clap::{Args, ValueEnum};
use console::style;
use tracing::info;

use crate::aggregate::{aggregate, DirectoryTree};
use crate::config::load_config;
use crate::error::ReconError;
use crate::reconcile::{reconcile, Reconciliation};
use crate::render::{markdown, plain, readme, report, RepoSection};
use crate::scan::MeshScanner;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Plain,
    Markdown,
    Json,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Directory containing the reference repositories
    #[arg(long, value_name = "DIR")]
    pub root: PathBuf,

    /// Directory containing the reconstructed design trees
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub target: PathBuf,

    /// Repository to report on (repeatable; default: all configured)
    #[arg(long = "repo", value_name = "NAME")]
    pub repos: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: ReportFormat,

    /// Patch this README's stats block instead of printing (implies markdown)
    #[arg(long, value_name = "PATH")]
    pub readme: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Omit the generation timestamp from markdown and JSON output
    #[arg(long)]
    pub no_timestamp: bool,
}

pub fn run(args: ReportArgs) -> Result<()> {
    let config = load_config(Path::new("."), args.config.as_deref())?;
    let ruleset = config.ruleset();

    let selected: Vec<String> = if args.repos.is_empty() {
        config.repos.keys().cloned().collect()
    } else {
        args.repos.clone()
    };

    let mut results: Vec<(String, Reconciliation)> = Vec::new();
    for name in &selected {
        let spec = config.repo(name)?;
        let reference_root = args.root.join(name);
        let target_root = args.target.join(name);
        if !target_root.is_dir() {
            return Err(ReconError::Configuration(format!(
                "target tree for {name} not found at {}",
                target_root.display()
            ))
            .into());
        }

        let scanner = MeshScanner::new(reference_root)
            .extension(&config.mesh_extension)
            .strip_prefix(spec.strip_prefix.clone())
            .ignore_substrings(config.ignore_substrings.clone());
        let outcome = reconcile(&scanner, &target_root, &ruleset, &config.design_extension)?;
        info!(
            repo = %name,
            reconstructed = outcome.completed(),
            total = outcome.total(),
            "reconciled"
        );
        results.push((name.clone(), outcome));
    }

    let trees: Vec<DirectoryTree> = results.iter().map(|(_, outcome)| aggregate(outcome)).collect();
    let mut sections: Vec<RepoSection<'_>> = Vec::with_capacity(results.len());
    for ((name, outcome), tree) in results.iter().zip(&trees) {
        sections.push(RepoSection {
            name,
            spec: config.repo(name)?,
            outcome,
            tree,
            mesh_extension: &config.mesh_extension,
            design_extension: &config.design_extension,
        });
    }

    let timestamp = (!args.no_timestamp)
        .then(|| Local::now().format("%Y-%m-%d %H:%M %z").to_string());

    if let Some(readme_path) = &args.readme {
        let mut buffer = Vec::new();
        markdown::render_document(&mut buffer, &sections, timestamp.as_deref())?;
        readme::patch(readme_path, std::str::from_utf8(&buffer)?)?;
        println!("{} {}", style("Updated").green().bold(), readme_path.display());
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        ReportFormat::Plain => {
            for section in &sections {
                writeln!(out, "{}", style(section.name).bold())?;
                writeln!(out)?;
                plain::render(&mut out, section.outcome)?;
                writeln!(out)?;
            }
        }
        ReportFormat::Markdown => {
            markdown::render_document(&mut out, &sections, timestamp.as_deref())?;
        }
        ReportFormat::Json => {
            report::write_json(&mut out, &sections, !args.no_timestamp)?;
        }
    }

    Ok(())
}
