//! mesh-recon binary entry point.

use anyhow::Result;

fn main() -> Result<()> {
    mesh_recon::cli::run()
}
