// Typed failures surfaced by fragment assembly and the joiners

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JoinError {
    #[error("duplicate fragment identifier '{0}'")]
    DuplicateFragment(String),

    #[error("fragment identifier must not be empty")]
    EmptyFragmentId,

    #[error("fragment directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("fragment pattern '{0}' must contain the {{n}} placeholder")]
    MissingPlaceholder(String),

    #[error("fragment count must be at least 1")]
    EmptyRange,

    #[error("numbered range of {requested} fragments exceeds the limit of {limit}")]
    TooManyFragments { requested: u64, limit: u32 },

    #[error("output {} is also listed as fragment '{id}'", .path.display())]
    OutputIsFragment { id: String, path: PathBuf },

    #[error("no fragments matching '{pattern}' found in {}", .dir.display())]
    NothingDiscovered { pattern: String, dir: PathBuf },

    #[error(
        "written output {} does not match the assembled document (expected sha256 {expected}, found {actual})",
        .path.display()
    )]
    VerificationFailed {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}
