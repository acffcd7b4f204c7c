// Join a fixed list of named fragments, then remove the consumed sources

use crate::error::JoinError;
use crate::fragment::{assemble, Assembly, FragmentSet};
use crate::model::NamedSettings;
use crate::writer;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    /// Sources deleted after the output was verified, in list order.
    Removed(Vec<PathBuf>),
    /// `keep_fragments` was set.
    Kept,
    /// Dry run: nothing was written, so nothing was deleted.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct NamedJoinRun {
    pub assembly: Assembly,
    pub output: PathBuf,
    pub written: bool,
    pub digest: Option<String>,
    pub cleanup: Cleanup,
}

/// Assemble the named fragment list into `settings.output`.
///
/// Sources are deleted only once the written file has been read back and its
/// digest matches the assembled document.
pub fn join_named(settings: &NamedSettings, dry_run: bool) -> Result<NamedJoinRun> {
    let set = FragmentSet::new(&settings.dir, settings.fragments.clone())?;

    for (id, path) in set.iter() {
        if path == settings.output || same_file(&path, &settings.output) {
            return Err(JoinError::OutputIsFragment {
                id: id.to_string(),
                path,
            }
            .into());
        }
    }

    let assembly = assemble(&set, settings.leading_artifact.as_deref())?;

    if dry_run {
        return Ok(NamedJoinRun {
            assembly,
            output: settings.output.clone(),
            written: false,
            digest: None,
            cleanup: Cleanup::Skipped,
        });
    }

    writer::write_document(&settings.output, &assembly.document)?;
    let digest = writer::verify_document(&settings.output, &assembly.document)?;

    let cleanup = if settings.keep_fragments {
        Cleanup::Kept
    } else {
        let mut removed = Vec::new();
        for path in assembly.present_paths() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove fragment: {}", path.display()))?;
            removed.push(path);
        }
        Cleanup::Removed(removed)
    };

    Ok(NamedJoinRun {
        assembly,
        output: settings.output.clone(),
        written: true,
        digest: Some(digest),
        cleanup,
    })
}

/// Whether both paths exist and name the same file, through `..`, symlinks,
/// hard links or case folding.
fn same_file(a: &Path, b: &Path) -> bool {
    let (Ok(meta_a), Ok(meta_b)) = (fs::metadata(a), fs::metadata(b)) else {
        return false;
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino() {
            return true;
        }
    }
    #[cfg(not(unix))]
    let _ = (meta_a, meta_b);

    matches!(
        (fs::canonicalize(a), fs::canonicalize(b)),
        (Ok(ca), Ok(cb)) if ca == cb
    )
}
