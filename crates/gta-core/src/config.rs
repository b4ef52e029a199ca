use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration loaded from `$GTA_HOME/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub sweep: SweepSettings,

    #[serde(default)]
    pub verify: VerifySettings,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

/// Sweep settings from `[sweep]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSettings {
    /// Number of versions resolved concurrently.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
        }
    }
}

fn default_jobs() -> usize {
    1
}

/// Verification settings from `[verify]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifySettings {
    /// Kill the verification command after this many seconds; 0 disables.
    #[serde(default, rename = "timeout-secs")]
    pub timeout_secs: u64,
}

/// Source cache location from `[cache]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub dir: Option<String>,
}

/// GOPATH-like workspace root from `[workspace]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub path: Option<String>,
}

impl GlobalConfig {
    /// Load the global configuration, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load the configuration at `path`, or return defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| gta_util::errors::GtaError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            gta_util::errors::GtaError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Directory holding cached source metadata. Defaults to `$GTA_HOME/cache`.
    pub fn cache_dir(&self) -> PathBuf {
        match self.cache.dir {
            Some(ref dir) => expand_tilde(dir),
            None => dirs_path().join("cache"),
        }
    }

    /// The registry of dependency indexes inside the cache directory.
    pub fn registry_dir(&self) -> PathBuf {
        self.cache_dir().join("registry")
    }

    /// The workspace root: `GTA_WORKSPACE`, then `[workspace] path`, then `~/gta`.
    pub fn workspace_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var("GTA_WORKSPACE") {
            if !dir.is_empty() {
                return expand_tilde(&dir);
            }
        }
        match self.workspace.path {
            Some(ref dir) => expand_tilde(dir),
            None => home_dir().join("gta"),
        }
    }
}

/// Returns the gta data directory: `GTA_HOME`, or `~/.gta/`.
pub fn dirs_path() -> PathBuf {
    match std::env::var("GTA_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home_dir().join(".gta"),
    }
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None if path == "~" => home_dir(),
        None => PathBuf::from(path),
    }
}
