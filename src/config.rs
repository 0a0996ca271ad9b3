use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_DIR;
use crate::emit::DEFAULT_OUTPUT_FILE;
use crate::plan::DEFAULT_WEIGHT_THRESHOLD;

pub const CONFIG_FILE_NAME: &str = ".rivetrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub ignores: Vec<String>,
    /// Subdirectories of the source root to scan; empty scans the whole root.
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Run-level default namespace, lowest in the resolution precedence.
    #[serde(default)]
    pub module_namespace: Option<String>,
    #[serde(default = "default_weight_threshold")]
    pub weight_threshold: usize,
    #[serde(default = "default_incremental")]
    pub incremental: bool,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_weight_threshold() -> usize {
    DEFAULT_WEIGHT_THRESHOLD
}

fn default_incremental() -> bool {
    true
}

fn default_cache_dir() -> String {
    DEFAULT_CACHE_DIR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: Vec::new(),
            includes: Vec::new(),
            source_root: default_source_root(),
            output_path: default_output_path(),
            module_namespace: None,
            weight_threshold: default_weight_threshold(),
            incremental: default_incremental(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob patterns in `ignores` or `includes` are invalid.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are treated as literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
