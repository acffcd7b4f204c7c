use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DIR: &str = "docs/daikin-api";
pub const DEFAULT_NAMED_OUTPUT: &str = "docs/daikin-api/openapi.part11.json";
pub const DEFAULT_NUMBERED_OUTPUT: &str = "docs/daikin-api/openapi.json";
pub const DEFAULT_PATTERN: &str = "openapi.part{n}.json";
pub const DEFAULT_LEADING_ARTIFACT: &str = "t\t";
pub const DEFAULT_COUNT: u32 = 24;
pub const DEFAULT_CONTEXT_RADIUS: usize = 500;

/// On-disk config file. Every field is optional so user and local
/// configs can override just the keys they care about.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub named: Option<PartialNamed>,
    pub numbered: Option<PartialNumbered>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialNamed {
    pub dir: Option<String>,
    pub fragments: Option<Vec<String>>,
    pub output: Option<String>,
    #[serde(rename = "leadingArtifact")]
    pub leading_artifact: Option<String>,
    #[serde(rename = "keepFragments")]
    pub keep_fragments: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialNumbered {
    pub dir: Option<String>,
    pub pattern: Option<String>,
    pub first: Option<u32>,
    pub count: Option<u32>,
    pub discover: Option<bool>,
    pub output: Option<String>,
    #[serde(rename = "contextRadius")]
    pub context_radius: Option<usize>,
}

/// Fully resolved configuration for both joiners.
#[derive(Debug, Clone, Default)]
pub struct JoinConfig {
    pub named: NamedSettings,
    pub numbered: NumberedSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSettings {
    pub dir: PathBuf,
    pub fragments: Vec<String>,
    pub output: PathBuf,
    /// Marker checked on the first fragment only; `None` disables the correction.
    pub leading_artifact: Option<String>,
    pub keep_fragments: bool,
}

impl Default for NamedSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            fragments: (1..=5).map(|i| format!("p{}.txt", i)).collect(),
            output: PathBuf::from(DEFAULT_NAMED_OUTPUT),
            leading_artifact: Some(DEFAULT_LEADING_ARTIFACT.to_string()),
            keep_fragments: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberedSettings {
    pub dir: PathBuf,
    pub pattern: String,
    pub first: u32,
    pub count: u32,
    /// Scan `dir` for the highest index instead of trusting `count`.
    pub discover: bool,
    pub output: PathBuf,
    pub context_radius: usize,
}

impl Default for NumberedSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            pattern: DEFAULT_PATTERN.to_string(),
            first: 1,
            count: DEFAULT_COUNT,
            discover: false,
            output: PathBuf::from(DEFAULT_NUMBERED_OUTPUT),
            context_radius: DEFAULT_CONTEXT_RADIUS,
        }
    }
}
