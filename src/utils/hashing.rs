//! Content hashing for duplicate detection.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::ReconError;

/// Hex digest of a file's full contents.
pub fn file_digest(path: &Path) -> Result<String, ReconError> {
    let bytes = fs::read(path)
        .map_err(|source| ReconError::Filesystem { path: path.to_path_buf(), source })?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
