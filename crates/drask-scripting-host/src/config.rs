use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Configuration for the scripting engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptingConfig {
    /// Whether scripting is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Directory containing scripts (default: ./scripts)
    #[serde(default)]
    pub script_dir: Option<PathBuf>,

    /// Maximum number of execution-output lines shown to an administrative
    /// caller before the rest is reported as truncated
    #[serde(default = "default_max_output_lines")]
    pub max_output_lines: usize,

    /// Maximum length of a single execution-output line
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_max_output_lines() -> usize {
    10
}

fn default_max_line_length() -> usize {
    250
}

impl Default for ScriptingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            script_dir: None,
            max_output_lines: default_max_output_lines(),
            max_line_length: default_max_line_length(),
        }
    }
}

impl ScriptingConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Get the script directory path, resolving relative paths against the
    /// current directory.
    pub fn script_dir(&self) -> PathBuf {
        let dir = self
            .script_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("scripts"));
        if dir.is_absolute() {
            dir
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&dir))
                .unwrap_or(dir)
        }
    }
}
