// Ordered fragment sets and the shared concatenation pass used by both joiners

use crate::error::JoinError;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the fragment index in numbered patterns.
pub const INDEX_PLACEHOLDER: &str = "{n}";

/// Upper bound on the size of a numbered range.
pub const MAX_NUMBERED_FRAGMENTS: u32 = 100_000;

/// An ordered list of unique fragment file names under one directory.
#[derive(Debug, Clone)]
pub struct FragmentSet {
    base_dir: PathBuf,
    ids: Vec<String>,
}

impl FragmentSet {
    pub fn new(base_dir: impl Into<PathBuf>, ids: Vec<String>) -> Result<Self, JoinError> {
        let mut seen = HashSet::new();
        for id in &ids {
            if id.is_empty() {
                return Err(JoinError::EmptyFragmentId);
            }
            if !seen.insert(id.as_str()) {
                return Err(JoinError::DuplicateFragment(id.clone()));
            }
        }

        Ok(Self {
            base_dir: base_dir.into(),
            ids,
        })
    }

    /// Build `pattern` with `{n}` replaced by each index of `range`, in ascending order.
    pub fn numbered(
        base_dir: impl Into<PathBuf>,
        pattern: &str,
        range: RangeInclusive<u32>,
    ) -> Result<Self, JoinError> {
        if !pattern.contains(INDEX_PLACEHOLDER) {
            return Err(JoinError::MissingPlaceholder(pattern.to_string()));
        }
        if range.is_empty() {
            return Err(JoinError::EmptyRange);
        }
        let span = u64::from(*range.end()) - u64::from(*range.start()) + 1;
        if span > u64::from(MAX_NUMBERED_FRAGMENTS) {
            return Err(JoinError::TooManyFragments {
                requested: span,
                limit: MAX_NUMBERED_FRAGMENTS,
            });
        }

        let ids = range
            .map(|i| pattern.replace(INDEX_PLACEHOLDER, &i.to_string()))
            .collect();
        Self::new(base_dir, ids)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn path_of(&self, id: &str) -> PathBuf {
        self.base_dir.join(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, PathBuf)> + '_ {
        self.ids.iter().map(|id| (id.as_str(), self.path_of(id)))
    }
}

/// Files in `dir` whose name matches `pattern`, ordered by index then name.
///
/// Only files that exist are returned, so a stray high index never widens
/// the set beyond what is on disk.
pub fn discover_fragments(dir: &Path, pattern: &str) -> Result<Vec<(u32, String)>> {
    let (prefix, suffix) = pattern
        .split_once(INDEX_PLACEHOLDER)
        .ok_or_else(|| JoinError::MissingPlaceholder(pattern.to_string()))?;
    let re = Regex::new(&format!(
        "^{}([0-9]+){}$",
        regex::escape(prefix),
        regex::escape(suffix)
    ))
    .with_context(|| format!("Invalid fragment pattern: {}", pattern))?;

    let mut found = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read fragment dir: {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(caps) = re.captures(name) {
            // Indices too large for u32 are not ours
            if let Ok(index) = caps[1].parse::<u32>() {
                found.push((index, name.to_string()));
            }
        }
    }

    found.sort();
    Ok(found)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentStatus {
    Present {
        chars: usize,
        bytes: usize,
        /// The leading artifact was stripped from this fragment.
        trimmed: bool,
    },
    Missing,
}

#[derive(Debug, Clone)]
pub struct FragmentReport {
    pub id: String,
    pub path: PathBuf,
    pub status: FragmentStatus,
}

impl FragmentReport {
    pub fn is_present(&self) -> bool {
        matches!(self.status, FragmentStatus::Present { .. })
    }
}

/// Whether every fragment of the set made it into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completeness {
    Complete,
    Partial { missing: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: String,
    pub fragments: Vec<FragmentReport>,
}

impl Assembly {
    pub fn completeness(&self) -> Completeness {
        let missing: Vec<String> = self
            .fragments
            .iter()
            .filter(|f| !f.is_present())
            .map(|f| f.id.clone())
            .collect();

        if missing.is_empty() {
            Completeness::Complete
        } else {
            Completeness::Partial { missing }
        }
    }

    /// Paths of the fragments that were read, in set order.
    pub fn present_paths(&self) -> Vec<PathBuf> {
        self.fragments
            .iter()
            .filter(|f| f.is_present())
            .map(|f| f.path.clone())
            .collect()
    }

    pub fn chars(&self) -> usize {
        self.document.chars().count()
    }
}

/// Concatenate every present fragment of `set` in order.
///
/// Missing fragments are recorded and skipped. When `leading_artifact` is set
/// and the fragment at position 0 starts with it, that fragment loses its
/// first character. No other fragment is touched.
pub fn assemble(set: &FragmentSet, leading_artifact: Option<&str>) -> Result<Assembly> {
    if !set.base_dir().is_dir() {
        return Err(JoinError::MissingDirectory(set.base_dir().to_path_buf()).into());
    }

    let mut document = String::new();
    let mut fragments = Vec::with_capacity(set.len());

    for (position, (id, path)) in set.iter().enumerate() {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fragments.push(FragmentReport {
                    id: id.to_string(),
                    path,
                    status: FragmentStatus::Missing,
                });
                continue;
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read fragment: {}", path.display()))
            }
        };

        let chars = content.chars().count();
        let bytes = content.len();

        let (content, trimmed) = match leading_artifact {
            Some(marker) if position == 0 && !marker.is_empty() => strip_leading_artifact(&content, marker),
            _ => (content.as_str(), false),
        };

        document.push_str(content);
        fragments.push(FragmentReport {
            id: id.to_string(),
            path,
            status: FragmentStatus::Present {
                chars,
                bytes,
                trimmed,
            },
        });
    }

    Ok(Assembly {
        document,
        fragments,
    })
}

/// Drop the first character of `content` if it starts with `marker`.
pub fn strip_leading_artifact<'a>(content: &'a str, marker: &str) -> (&'a str, bool) {
    if !content.starts_with(marker) {
        return (content, false);
    }
    let mut chars = content.chars();
    chars.next();
    (chars.as_str(), true)
}
