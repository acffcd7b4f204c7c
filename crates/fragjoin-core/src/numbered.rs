// Join a numbered fragment sequence and check the result is valid JSON

use crate::error::JoinError;
use crate::fragment::{assemble, discover_fragments, Assembly, FragmentSet};
use crate::model::NumberedSettings;
use crate::validate::{check_json, JsonCheck, JsonDiagnostic};
use crate::writer;
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid { chars: usize },
    Invalid(JsonDiagnostic),
    /// The output could not be written; the message is the full error chain.
    WriteFailed(String),
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid { .. })
    }
}

#[derive(Debug, Clone)]
pub struct NumberedJoinRun {
    pub assembly: Assembly,
    pub output: PathBuf,
    pub written: bool,
    pub verification: Verification,
}

/// Fragments to read, either `first..first+count` or the matching files found in `dir`.
///
/// Discovery only includes files present on disk with an index of at least `first`.
pub fn resolve_set(settings: &NumberedSettings) -> Result<FragmentSet> {
    if settings.discover {
        if !settings.dir.is_dir() {
            return Err(JoinError::MissingDirectory(settings.dir.clone()).into());
        }
        let names: Vec<String> = discover_fragments(&settings.dir, &settings.pattern)?
            .into_iter()
            .filter(|(index, _)| *index >= settings.first)
            .map(|(_, name)| name)
            .collect();
        if names.is_empty() {
            return Err(JoinError::NothingDiscovered {
                pattern: settings.pattern.clone(),
                dir: settings.dir.clone(),
            }
            .into());
        }
        return Ok(FragmentSet::new(&settings.dir, names)?);
    }

    if settings.count == 0 {
        return Err(JoinError::EmptyRange.into());
    }
    let last = settings.first.saturating_add(settings.count - 1);
    Ok(FragmentSet::numbered(
        &settings.dir,
        &settings.pattern,
        settings.first..=last,
    )?)
}

/// Concatenate the numbered fragments into `settings.output` and validate it.
///
/// Write failures are captured in the returned [`Verification`] rather than
/// propagated; the output is never rolled back and fragments are never deleted.
pub fn join_numbered(settings: &NumberedSettings, dry_run: bool) -> Result<NumberedJoinRun> {
    let set = resolve_set(settings)?;
    let assembly = assemble(&set, None)?;

    let mut written = false;
    if !dry_run {
        if let Err(e) = writer::write_document(&settings.output, &assembly.document) {
            return Ok(NumberedJoinRun {
                assembly,
                output: settings.output.clone(),
                written,
                verification: Verification::WriteFailed(format!("{:#}", e)),
            });
        }
        written = true;
    }

    let verification = match check_json(&assembly.document, settings.context_radius) {
        JsonCheck::Valid { chars } => Verification::Valid { chars },
        JsonCheck::Invalid(diag) => Verification::Invalid(diag),
    };

    Ok(NumberedJoinRun {
        assembly,
        output: settings.output.clone(),
        written,
        verification,
    })
}
