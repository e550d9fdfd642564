//! Plain-text progress report.

use std::io::{self, Write};

use crate::reconcile::Reconciliation;

/// How many of the smallest missing files to list as starting points.
const LOW_HANGING_FRUIT: usize = 20;

/// Render the printout-style report for one repository.
pub fn render(out: &mut dyn Write, outcome: &Reconciliation) -> io::Result<()> {
    writeln!(out, "Reconstructed meshes:")?;
    writeln!(out)?;
    for path in outcome.reconstructed.keys() {
        writeln!(out, "{path}")?;
    }

    writeln!(out)?;
    writeln!(out)?;
    writeln!(out, "Missing meshes:")?;
    writeln!(out)?;
    for path in outcome.missing.keys() {
        writeln!(out, "{path}")?;
    }

    writeln!(out)?;
    writeln!(out)?;
    writeln!(out, "Low-hanging fruit:")?;
    writeln!(out)?;
    let mut by_size: Vec<(&String, &u64)> = outcome.missing.iter().collect();
    by_size.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
    for (path, size) in by_size.into_iter().take(LOW_HANGING_FRUIT) {
        writeln!(out, "{path} [{size} bytes]")?;
    }

    writeln!(out)?;
    writeln!(out)?;
    match outcome.percent() {
        Some(percent) => writeln!(
            out,
            "{}/{} ({percent:.1}%) reconstructed",
            outcome.completed(),
            outcome.total()
        )?,
        None => writeln!(out, "no mesh files tracked")?,
    }
    Ok(())
}
