//! Optional tool configuration read from `exceltotable.json`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "exceltotable.json";

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV_VAR: &str = "EXCELTOTABLE_LOG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolConfig {
    /// Replaces `html` as the default of `-format`.
    pub default_format: Option<String>,
    /// Directory relative output paths are resolved against.
    pub output_dir: Option<PathBuf>,
    /// Fallback log filter when the environment does not set one.
    pub log: Option<String>,
}

impl ToolConfig {
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Resolves `path` against `output_dir` (or the working directory).
    pub fn resolve_output(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match &self.output_dir {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }
}

/// Outcome of looking for `exceltotable.json`.
///
/// The lookup runs before logging is configured (the config chooses the log
/// filter), so skipped files are collected here and reported afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLookup {
    pub config: Option<ToolConfig>,
    /// One message per config file that was found but skipped.
    pub problems: Vec<String>,
}

impl ConfigLookup {
    /// Logs every skipped file as a warning.
    pub fn report(&self) {
        for problem in &self.problems {
            tracing::warn!("{}", problem);
        }
        if self.config.is_some() {
            tracing::debug!("Using {} configuration", CONFIG_FILE_NAME);
        }
    }
}

/// Looks in `folders` for `exceltotable.json`; the first readable, well-formed
/// file wins. Malformed or unreadable files are skipped and recorded.
pub fn load_tool_config(folders: &[PathBuf]) -> ConfigLookup {
    let mut lookup = ConfigLookup::default();
    for folder in folders {
        let path = folder.join(CONFIG_FILE_NAME);
        if !path.exists() {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(data) => match ToolConfig::from_json(&data) {
                Ok(config) => {
                    lookup.config = Some(config);
                    return lookup;
                }
                Err(err) => lookup
                    .problems
                    .push(format!("Ignoring malformed {}: {}", path.display(), err)),
            },
            Err(err) => lookup
                .problems
                .push(format!("Could not read {}: {}", path.display(), err)),
        }
    }
    lookup
}
