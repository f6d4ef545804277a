use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides the default config file location.
pub const CONFIG_PATH_ENV: &str = "MARKDOWN_TWINVIEW_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for `{field}` in {config_path}: {reason}")]
    InvalidValue {
        config_path: PathBuf,
        field: &'static str,
        reason: String,
    },
}

/// A size tier for coalescing outgoing content flushes.
///
/// Documents longer than `min_chars` wait `delay_ms` after the last edit
/// before being written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceTier {
    pub min_chars: usize,
    pub delay_ms: u64,
}

/// Tunables for cursor capture, relocation and content flushing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Characters captured on each side of the cursor for window matching.
    pub context_window: usize,
    /// Minimum combined context length before a window match is trusted.
    pub min_context_len: usize,
    /// `percent_in_line` at or above this snaps to the end of the line.
    pub eol_snap_threshold: f64,
    /// How far (in lines) a preceding candidate may be before a strictly
    /// closer following candidate wins the closest-line match.
    pub closest_line_forward_bias: usize,
    /// Flush delays by document size. Documents below every tier flush on
    /// the next frame.
    pub debounce_tiers: Vec<DebounceTier>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            context_window: 20,
            min_context_len: 3,
            eol_snap_threshold: 0.99,
            closest_line_forward_bias: 10,
            debounce_tiers: vec![
                DebounceTier {
                    min_chars: 20_000,
                    delay_ms: 150,
                },
                DebounceTier {
                    min_chars: 50_000,
                    delay_ms: 300,
                },
            ],
        }
    }
}

impl SyncConfig {
    /// Returns the flush delay for a document of `len` characters, or `None`
    /// when the flush should run on the next frame.
    pub fn debounce_for(&self, len: usize) -> Option<Duration> {
        self.debounce_tiers
            .iter()
            .filter(|tier| len > tier.min_chars)
            .max_by_key(|tier| tier.min_chars)
            .map(|tier| Duration::from_millis(tier.delay_ms))
    }

    fn validate(&self, config_path: &Path) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| ConfigError::InvalidValue {
            config_path: config_path.to_path_buf(),
            field,
            reason: reason.to_string(),
        };

        if !(self.eol_snap_threshold > 0.0 && self.eol_snap_threshold <= 1.0) {
            return Err(invalid("eol_snap_threshold", "must be in (0, 1]"));
        }
        if self.context_window == 0 {
            return Err(invalid("context_window", "must be at least 1"));
        }
        if self.min_context_len > self.context_window * 2 {
            return Err(invalid(
                "min_context_len",
                "can never be reached with the configured context_window",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
}

impl Config {
    /// Reads the config at `config_path`. A missing file is `Ok(None)`, not
    /// an error.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ConfigReadError {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&content, config_path).map(Some)
    }

    /// Parses, validates and normalizes TOML `content`. `config_path` only
    /// labels errors.
    pub fn parse(content: &str, config_path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config =
            toml::from_str(content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        config.sync.validate(config_path)?;
        config.sync.debounce_tiers.sort_by_key(|tier| tier.min_chars);
        Ok(config)
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Loads the config file, falling back to defaults when it doesn't exist.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        if let Ok(overridden) = std::env::var(CONFIG_PATH_ENV)
            && let Some(path) = Self::expand_path(Path::new(&overridden))
        {
            return path;
        }
        let config_dir = shellexpand::tilde("~/.config/markdown-twinview");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
