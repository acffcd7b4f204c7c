use crate::error::JoinError;
use crate::model::{
    JoinConfig, NamedSettings, NumberedSettings, PartialConfig, PartialNamed, PartialNumbered,
};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".fragjoin";
pub const PROJECT_CONFIG: &str = ".fragjoin/config.toml";
pub const LOCAL_CONFIG: &str = ".fragjoin/config.local.toml";

/// Parse a single config file without merging or defaults.
pub fn load_config(path: &Path) -> Result<PartialConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: PartialConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(config)
}

/// Load config with precedence:
/// 1. User config (~/.fragjoin/config.toml) - lowest priority
/// 2. Project config (<root>/.fragjoin/config.toml) - medium priority
/// 3. Local config (<root>/.fragjoin/config.local.toml) - highest priority
///
/// Every layer is optional; missing keys fall back to the built-in defaults.
/// Relative paths are resolved against `root`.
pub fn load_config_with_precedence(root: &Path) -> Result<JoinConfig> {
    let mut configs = Vec::new();

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            match load_config(&user_config) {
                Ok(cfg) => configs.push(cfg),
                Err(e) => eprintln!("Warning: Failed to load user config: {:#}", e),
            }
        }
    }

    // A broken project config is an error, not a warning
    let project_config = root.join(PROJECT_CONFIG);
    if project_config.exists() {
        configs.push(load_config(&project_config)?);
    }

    let local_config = root.join(LOCAL_CONFIG);
    if local_config.exists() {
        match load_config(&local_config) {
            Ok(cfg) => configs.push(cfg),
            Err(e) => eprintln!("Warning: Failed to load local config: {:#}", e),
        }
    }

    resolve_config(merge_configs(configs), root)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join("config.toml"))
}

/// Merge partial configs field by field, later ones winning.
pub fn merge_configs(configs: Vec<PartialConfig>) -> PartialConfig {
    let mut merged = PartialConfig::default();

    for cfg in configs {
        if let Some(new_named) = cfg.named {
            let named = merged.named.get_or_insert_with(PartialNamed::default);
            if new_named.dir.is_some() {
                named.dir = new_named.dir;
            }
            if new_named.fragments.is_some() {
                named.fragments = new_named.fragments;
            }
            if new_named.output.is_some() {
                named.output = new_named.output;
            }
            if new_named.leading_artifact.is_some() {
                named.leading_artifact = new_named.leading_artifact;
            }
            if new_named.keep_fragments.is_some() {
                named.keep_fragments = new_named.keep_fragments;
            }
        }

        if let Some(new_numbered) = cfg.numbered {
            let numbered = merged.numbered.get_or_insert_with(PartialNumbered::default);
            if new_numbered.dir.is_some() {
                numbered.dir = new_numbered.dir;
            }
            if new_numbered.pattern.is_some() {
                numbered.pattern = new_numbered.pattern;
            }
            if new_numbered.first.is_some() {
                numbered.first = new_numbered.first;
            }
            if new_numbered.count.is_some() {
                numbered.count = new_numbered.count;
            }
            if new_numbered.discover.is_some() {
                numbered.discover = new_numbered.discover;
            }
            if new_numbered.output.is_some() {
                numbered.output = new_numbered.output;
            }
            if new_numbered.context_radius.is_some() {
                numbered.context_radius = new_numbered.context_radius;
            }
        }
    }

    merged
}

/// Fill defaults, resolve paths against `root` and validate.
pub fn resolve_config(partial: PartialConfig, root: &Path) -> Result<JoinConfig> {
    let named_defaults = NamedSettings::default();
    let named_partial = partial.named.unwrap_or_default();

    let leading_artifact = match named_partial.leading_artifact {
        Some(marker) if marker.is_empty() => None,
        Some(marker) => Some(marker),
        None => named_defaults.leading_artifact,
    };

    let named = NamedSettings {
        dir: resolve_path(root, named_partial.dir.as_deref(), &named_defaults.dir),
        fragments: named_partial.fragments.unwrap_or(named_defaults.fragments),
        output: resolve_path(root, named_partial.output.as_deref(), &named_defaults.output),
        leading_artifact,
        keep_fragments: named_partial.keep_fragments.unwrap_or(false),
    };

    let numbered_defaults = NumberedSettings::default();
    let numbered_partial = partial.numbered.unwrap_or_default();

    let numbered = NumberedSettings {
        dir: resolve_path(root, numbered_partial.dir.as_deref(), &numbered_defaults.dir),
        pattern: numbered_partial.pattern.unwrap_or(numbered_defaults.pattern),
        first: numbered_partial.first.unwrap_or(numbered_defaults.first),
        count: numbered_partial.count.unwrap_or(numbered_defaults.count),
        discover: numbered_partial.discover.unwrap_or(false),
        output: resolve_path(
            root,
            numbered_partial.output.as_deref(),
            &numbered_defaults.output,
        ),
        context_radius: numbered_partial
            .context_radius
            .unwrap_or(numbered_defaults.context_radius),
    };

    if !numbered.pattern.contains("{n}") {
        return Err(JoinError::MissingPlaceholder(numbered.pattern).into());
    }
    if numbered.count == 0 {
        return Err(JoinError::EmptyRange.into());
    }

    Ok(JoinConfig { named, numbered })
}

fn resolve_path(root: &Path, configured: Option<&str>, default: &Path) -> PathBuf {
    match configured {
        Some(p) => root.join(p),
        None => root.join(default),
    }
}

/// Render the default config as TOML, used by `fragjoin init`.
pub fn default_config_toml() -> Result<String> {
    let named = NamedSettings::default();
    let numbered = NumberedSettings::default();

    let cfg = PartialConfig {
        named: Some(PartialNamed {
            dir: Some(path_string(&named.dir)),
            fragments: Some(named.fragments),
            output: Some(path_string(&named.output)),
            leading_artifact: named.leading_artifact,
            keep_fragments: Some(named.keep_fragments),
        }),
        numbered: Some(PartialNumbered {
            dir: Some(path_string(&numbered.dir)),
            pattern: Some(numbered.pattern),
            first: Some(numbered.first),
            count: Some(numbered.count),
            discover: Some(numbered.discover),
            output: Some(path_string(&numbered.output)),
            context_radius: Some(numbered.context_radius),
        }),
    };

    toml::to_string_pretty(&cfg).context("Failed to serialize default config")
}

fn path_string(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
