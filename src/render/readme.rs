//! README progress-block splicing.

use std::fs;
use std::path::Path;

use crate::error::ReconError;

/// Replace the generated stats block in `readme` with `markdown`.
///
/// The block is the inclusive line range between the first lines containing
/// `BEGIN_STATS` and `END_STATS`; both must already be present. The
/// replacement text carries its own marker lines, so a patched README can be
/// patched again. On any failure the README is left untouched.
pub fn patch(readme: &Path, markdown: &str) -> Result<(), ReconError> {
    let content = fs::read_to_string(readme)
        .map_err(|source| ReconError::Filesystem { path: readme.to_path_buf(), source })?;

    let lines: Vec<&str> = content.split('\n').collect();
    let begin = lines.iter().position(|line| line.contains("BEGIN_STATS"));
    let end = lines.iter().position(|line| line.contains("END_STATS"));
    let (Some(begin), Some(end)) = (begin, end) else {
        return Err(ReconError::Configuration(format!(
            "{} does not contain BEGIN_STATS/END_STATS markers",
            readme.display()
        )));
    };
    if end < begin {
        return Err(ReconError::Configuration(format!(
            "{} has END_STATS before BEGIN_STATS",
            readme.display()
        )));
    }

    let mut patched: Vec<&str> = Vec::with_capacity(lines.len());
    patched.extend(&lines[..begin]);
    patched.extend(markdown.trim_end_matches('\n').split('\n'));
    patched.extend(&lines[end + 1..]);

    fs::write(readme, patched.join("\n"))
        .map_err(|source| ReconError::Filesystem { path: readme.to_path_buf(), source })?;
    Ok(())
}
