// Write the assembled document and confirm what landed on disk

use crate::error::JoinError;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Truncate-and-write `content` to `path`, creating parent directories.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write output to {}", path.display()))?;

    Ok(())
}

/// Re-read `path` and check it holds exactly `content`.
///
/// Returns the hex digest of the verified file.
pub fn verify_document(path: &Path, content: &str) -> Result<String> {
    let on_disk = fs::read(path)
        .with_context(|| format!("Failed to re-read output: {}", path.display()))?;

    let expected = sha256_hex(content.as_bytes());
    let actual = sha256_hex(&on_disk);

    if expected != actual {
        return Err(JoinError::VerificationFailed {
            path: path.to_path_buf(),
            expected,
            actual,
        }
        .into());
    }

    Ok(actual)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
