//! Configuration management for framer.
//!
//! Parses `framer.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values in the `[filter]` section support environment variable
//! expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `filter.shell`
//! - `filter.image_prefix`
//!
//! `filter.default_command` is passed to the shell verbatim so that `$1` and
//! `$(...)` keep their shell meaning.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override poster mode.
    pub poster_mode: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "framer.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Use the narrow-column spacing and list variants.
    pub poster_mode: bool,
    /// List expansion settings.
    pub lists: ListsConfig,
    /// Inline highlight settings.
    pub highlight: HighlightConfig,
    /// External filter settings for gobbled blocks.
    pub filter: FilterConfig,
    /// Include assembly settings.
    pub assemble: AssembleConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// List expansion configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListsConfig {
    /// Vertical space emitted after a list block is closed.
    pub after_space: String,
    /// Left margin of the poster-mode `list` environment.
    pub poster_left_margin: String,
    /// Zero `\itemsep` and `\parsep` inside poster-mode lists.
    pub poster_compact: bool,
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            after_space: "0.5em".to_owned(),
            poster_left_margin: "1em".to_owned(),
            poster_compact: true,
        }
    }
}

/// Inline highlight configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Background colour of the highlight box.
    pub colour: String,
    /// Default space above the highlighted text.
    pub top: String,
    /// Default space below the highlighted text.
    pub bottom: String,
    /// Space below the second and later bare highlights on one line.
    pub repeat_bottom: String,
    /// Space above the highlighted text in poster mode.
    pub poster_top: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            colour: "yellow!30".to_owned(),
            top: "2pt".to_owned(),
            bottom: "2pt".to_owned(),
            repeat_bottom: "0pt".to_owned(),
            poster_top: "-1pt".to_owned(),
        }
    }
}

/// External filter configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Shell used to run filter commands (invoked as `<shell> -c <command>`).
    pub shell: String,
    /// Command run for filter blocks without a name.
    ///
    /// `{image}` is replaced by the generated image name and `{args}` by the
    /// arguments of the filter marker.
    pub default_command: String,
    /// Prefix of generated image names.
    pub image_prefix: String,
    /// Seconds a filter may run before it is killed.
    pub timeout_secs: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            shell: "sh".to_owned(),
            default_command: r"cat > {image}.tex && printf '%s\n' '\input{{image}.tex}'".to_owned(),
            image_prefix: "image".to_owned(),
            timeout_secs: 60,
        }
    }
}

/// Include assembly configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AssembleConfig {
    /// Maximum `\input` nesting depth before assembly fails.
    pub max_include_depth: usize,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            max_include_depth: 64,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`filter.shell`").
        field: String,
        /// Error message.
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `framer.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(poster_mode) = settings.poster_mode {
            self.poster_mode = poster_mode;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.filter.shell, "filter.shell")?;
        require_non_empty(&self.filter.default_command, "filter.default_command")?;
        if self.filter.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "filter.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.assemble.max_include_depth == 0 {
            return Err(ConfigError::Validation(
                "assemble.max_include_depth must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.filter.shell = expand::expand_env(&self.filter.shell, "filter.shell")?;
        self.filter.image_prefix =
            expand::expand_env(&self.filter.image_prefix, "filter.image_prefix")?;
        Ok(())
    }
}
