//! Configuration management for vdocs.
//!
//! Parses `vdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base_path`
//!
//! ## Example
//!
//! ```toml
//! [site]
//! base_path = "/docs/"
//! source_dir = "docs"
//!
//! [versions]
//! list = ["1.0", "2.0"]
//!
//! [[navigation."/2.0/"]]
//! title = "Guide"
//! collapsible = true
//! items = [{ text = "Installation", link = "/2.0/installation" }]
//! ```

mod expand;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site base path.
    pub base_path: Option<String>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "vdocs.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Known documentation versions.
    pub versions: VersionsConfig,
    /// Navigation sections keyed by route prefix.
    pub navigation: HashMap<String, Vec<NavSectionConfig>>,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    base_path: Option<String>,
    source_dir: Option<String>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Root path prefix the site is served under (e.g. `/docs/`).
    pub base_path: String,
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
}

/// Version list configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VersionsConfig {
    /// Version identifiers, oldest first. The last entry is the current version.
    pub list: Vec<String>,
}

/// One navigation section as written in TOML.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NavSectionConfig {
    /// Section heading.
    pub title: String,
    /// Whether the section can be collapsed. Defaults to whether
    /// `collapsed` is given.
    #[serde(default)]
    pub collapsible: Option<bool>,
    /// Whether the section starts collapsed.
    #[serde(default)]
    pub collapsed: Option<bool>,
    /// Section entries in display order.
    pub items: Vec<NavItemConfig>,
}

impl NavSectionConfig {
    /// Whether the section can be collapsed.
    ///
    /// Writing `collapsed` alone, either value, makes the section
    /// collapsible. An explicit `collapsible` wins.
    pub fn is_collapsible(&self) -> bool {
        self.collapsible.unwrap_or(self.collapsed.is_some())
    }

    /// Whether the section starts collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed.unwrap_or(false)
    }
}

/// One navigation entry as written in TOML.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NavItemConfig {
    /// Display label.
    pub text: String,
    /// Target route path.
    pub link: String,
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
        /// Config field path (e.g., "`site.base_path`").
        field: String,
        /// Error message (e.g., "${`DOCS_BASE`} not set").
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
    /// Otherwise, searches for `vdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. Validation runs
    /// last, so an override can fix or break an otherwise valid file.
    ///
    /// # Errors
    ///
    /// Returns error if no config file exists, parsing fails, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            let cwd = std::env::current_dir().unwrap_or_default();
            return Err(ConfigError::NotFound(cwd.join(CONFIG_FILENAME)));
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from a TOML string, resolving paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base_dir);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_path) = &settings.base_path {
            self.site_resolved.base_path.clone_from(base_path);
        }
        if let Some(source_dir) = &settings.source_dir {
            self.site_resolved.source_dir.clone_from(source_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            versions: VersionsConfig::default(),
            navigation: HashMap::new(),
            site_resolved: SiteConfig {
                base_path: "/".to_owned(),
                source_dir: base.join("docs"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    ///
    /// Validation is left to [`Config::load`] so CLI settings apply first.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Only checks the site section. Version and navigation structure are
    /// validated when the site model is built from them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_path = &self.site_resolved.base_path;
        require_non_empty(base_path, "site.base_path")?;
        if !base_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "site.base_path must start with '/', got {base_path:?}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref base_path) = self.site.base_path {
            self.site.base_path = Some(expand::expand_env(base_path, "site.base_path")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// A missing `site.base_path` resolves to an empty string, which
    /// [`Config::validate`] rejects.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.site_resolved = SiteConfig {
            base_path: self.site.base_path.clone().unwrap_or_default(),
            source_dir: config_dir.join(self.site.source_dir.as_deref().unwrap_or("docs")),
        };
    }
}
