//! Nested markdown progress report with status glyphs and links.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::aggregate::DirectoryNode;
use crate::render::RepoSection;
use crate::utils::{normalize_path, normalize_segments, strip_suffix_ignore_ascii_case};

pub const MARKDOWN_RECONSTRUCTED: &str = ":white_check_mark:";
pub const MARKDOWN_MISSING: &str = ":black_large_square:";

pub const BEGIN_MARKER: &str = "<!-- BEGIN_STATS generated by mesh-recon, do not edit -->";
pub const END_MARKER: &str = "<!-- END_STATS -->";

/// Render the full markdown document: marker comments, progress header and
/// one section per tracked repository.
pub fn render_document(
    out: &mut dyn Write,
    sections: &[RepoSection<'_>],
    timestamp: Option<&str>,
) -> io::Result<()> {
    writeln!(out, "{BEGIN_MARKER}")?;
    match timestamp {
        Some(ts) => writeln!(out, "# Progress (as of {ts})")?,
        None => writeln!(out, "# Progress")?,
    }
    writeln!(out)?;
    for section in sections {
        render_section(out, section)?;
        writeln!(out)?;
    }
    writeln!(out, "{END_MARKER}")?;
    Ok(())
}

/// Render one repository's section: heading, progress-bar image and the
/// collapsible directory tree.
pub fn render_section(out: &mut dyn Write, section: &RepoSection<'_>) -> io::Result<()> {
    writeln!(out, "## {}", section.name)?;

    let outcome = section.outcome;
    let total = outcome.total();
    if total == 0 {
        writeln!(out, "_no mesh files tracked_")?;
        return Ok(());
    }

    let percent = outcome.completed() as f64 * 100.0 / total as f64;
    let title = format!("{:>7}", format!("{}/{}", outcome.completed(), total))
        .replace('/', "%2f")
        .replace(' ', "%20");
    writeln!(
        out,
        "<img src=\"https://progress-bar.dev/{percent:.0}?width=500&title_width=50&title={title}\"/>"
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "<details markdown=\"1\"><summary markdown=\"1\">Click to expand file tree...</summary>"
    )?;
    writeln!(out)?;

    for (prefix, node) in section.tree.nodes() {
        render_node(out, section, prefix, node)?;
    }

    writeln!(out, "</details>")?;
    Ok(())
}

fn render_node(
    out: &mut dyn Write,
    section: &RepoSection<'_>,
    prefix: &str,
    node: &DirectoryNode,
) -> io::Result<()> {
    let mesh_suffix = format!(".{}", section.mesh_extension);

    let indent = "  ".repeat(prefix.matches('/').count());
    let name = prefix.rsplit_once('/').map_or(prefix, |(_, base)| base);
    let glyph = if node.is_complete() { MARKDOWN_RECONSTRUCTED } else { MARKDOWN_MISSING };
    writeln!(
        out,
        "{indent}- {glyph} {} ({}/{}, {}%)",
        trim_suffix(name, &mesh_suffix),
        node.completed(),
        node.total(),
        node.percent()
    )?;

    for leaf in node.leaves() {
        let indent = "  ".repeat(leaf.matches('/').count());
        let (leaf_dir, file) = leaf.rsplit_once('/').unwrap_or(("", leaf.as_str()));
        let display = trim_suffix(file, &mesh_suffix);

        let mut line = match section.outcome.reconstructed.get(leaf) {
            Some(mapped) => {
                let link = link_target(mapped, section.name, leaf_dir);
                format!(
                    "{indent}- {MARKDOWN_RECONSTRUCTED} [{display}]({})",
                    link.replace(' ', "%20")
                )
            }
            None => format!("{indent}- {MARKDOWN_MISSING} {display}"),
        };

        let mut links = vec![format!(
            "[{}]({})",
            section.mesh_extension,
            upstream_url(section, leaf_dir, file)
        )];
        if let Some(mapped) = section.outcome.reconstructed.get(leaf) {
            let link = link_target(mapped, section.name, leaf_dir);
            links.push(format!("[{}]({})", section.design_extension, link.replace(' ', "%20")));
        }
        line.push_str(&format!(" ({})", links.join(", ")));
        writeln!(out, "{line}")?;
    }

    Ok(())
}

/// Link target for a mapped counterpart. A counterpart that is a symbolic
/// link is resolved lexically against its repo-local directory so the link
/// points at the shared design file rather than the alias.
fn link_target(mapped: &Path, repo_name: &str, leaf_dir: &str) -> String {
    if let Ok(target) = fs::read_link(mapped) {
        let joined = Path::new(repo_name).join(leaf_dir).join(target);
        return normalize_segments(&normalize_path(&joined.to_string_lossy()));
    }
    normalize_path(&mapped.to_string_lossy())
}

/// Blob URL of the upstream mesh file.
fn upstream_url(section: &RepoSection<'_>, leaf_dir: &str, file: &str) -> String {
    let mut url =
        format!("https://github.com/{}/blob/{}", section.spec.github, section.spec.branch);
    for segment in [section.spec.strip_prefix.as_deref().unwrap_or(""), leaf_dir] {
        if !segment.is_empty() {
            url.push('/');
            url.push_str(&segment.replace(' ', "%20"));
        }
    }
    url.push('/');
    url.push_str(&file.replace(' ', "%20"));
    url
}

fn trim_suffix<'a>(name: &'a str, suffix: &str) -> &'a str {
    strip_suffix_ignore_ascii_case(name, suffix).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::domain::RepoSpec;
    use crate::reconcile::Reconciliation;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn spec() -> RepoSpec {
        RepoSpec {
            github: "example/Widget".to_string(),
            strip_prefix: Some("STLs".to_string()),
            branch: "main".to_string(),
        }
    }

    fn render_to_string(outcome: &Reconciliation) -> String {
        let tree = aggregate(outcome);
        let spec = spec();
        let section = RepoSection {
            name: "Widget",
            spec: &spec,
            outcome,
            tree: &tree,
            mesh_extension: "stl",
            design_extension: "f3d",
        };
        let mut buffer = Vec::new();
        render_document(&mut buffer, &[section], None).expect("render");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn section_shows_progress_image_and_tree() {
        let outcome = Reconciliation {
            reconstructed: BTreeMap::from([(
                "Frame/corner.stl".to_string(),
                PathBuf::from("Widget/Frame/corner.f3d"),
            )]),
            missing: BTreeMap::from([("Frame/panel.stl".to_string(), 64)]),
        };
        let text = render_to_string(&outcome);

        assert!(text.contains("## Widget"));
        assert!(text.contains("https://progress-bar.dev/50?width=500&title_width=50"));
        // 1/2 right-aligned to seven columns, then percent-encoded.
        assert!(text.contains("title=%20%20%20%201%2f2"));
        assert!(text.contains("<details markdown=\"1\">"));
        assert!(text.contains("- :black_large_square: Frame (1/2, 50%)"));
        assert!(text.contains("  - :white_check_mark: [corner](Widget/Frame/corner.f3d)"));
        assert!(text.contains("  - :black_large_square: panel"));
        assert!(text
            .contains("[stl](https://github.com/example/Widget/blob/main/STLs/Frame/panel.stl)"));
        assert!(text.contains("[f3d](Widget/Frame/corner.f3d)"));
        assert!(text.starts_with(BEGIN_MARKER));
        assert!(text.trim_end().ends_with(END_MARKER));
    }

    #[test]
    fn complete_directories_get_the_check_glyph() {
        let outcome = Reconciliation {
            reconstructed: BTreeMap::from([(
                "Tools/wrench.stl".to_string(),
                PathBuf::from("Widget/Tools/wrench.f3d"),
            )]),
            missing: BTreeMap::new(),
        };
        let text = render_to_string(&outcome);
        assert!(text.contains("- :white_check_mark: Tools (1/1, 100%)"));
    }

    #[test]
    fn spaces_in_paths_are_percent_encoded() {
        let outcome = Reconciliation {
            reconstructed: BTreeMap::from([(
                "Test Prints/card caddy.stl".to_string(),
                PathBuf::from("Widget/Test Prints/card caddy.f3d"),
            )]),
            missing: BTreeMap::new(),
        };
        let text = render_to_string(&outcome);
        assert!(text.contains("[card caddy](Widget/Test%20Prints/card%20caddy.f3d)"));
        assert!(text.contains(
            "https://github.com/example/Widget/blob/main/STLs/Test%20Prints/card%20caddy.stl"
        ));
    }

    #[test]
    fn empty_outcome_renders_without_percentages() {
        let text = render_to_string(&Reconciliation::default());
        assert!(text.contains("## Widget"));
        assert!(text.contains("_no mesh files tracked_"));
        assert!(!text.contains("progress-bar.dev"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_counterparts_resolve_to_their_target() {
        use std::fs;
        use tempfile::TempDir;

        let tmp = TempDir::new().expect("tmp");
        let repo = tmp.path().join("Widget/Frame");
        fs::create_dir_all(&repo).expect("mkdir");
        fs::write(repo.join("corner_a.f3d"), "cad").expect("write");
        std::os::unix::fs::symlink("corner_a.f3d", repo.join("corner_b.f3d"))
            .expect("symlink");

        let mapped = repo.join("corner_b.f3d");
        let link = link_target(&mapped, "Widget", "Frame");
        assert_eq!(link, "Widget/Frame/corner_a.f3d");
    }
}
