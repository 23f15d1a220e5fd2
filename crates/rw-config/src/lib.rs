//! Configuration management for RW.
//!
//! Parses `rw.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [captions]
//! auto = true
//! prepend = false
//! auto_level = 2
//!
//! [[captions.types]]
//! name = "figure-caption"
//! prefix = "Figure {}."
//!
//! [[captions.types]]
//! name = "listing"
//! prefix = "Listing {}:"
//! ```
//!
//! When `[[captions.types]]` is given it replaces the default types
//! (`caption`, `figure-caption`, `table-caption`).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override automatic numbering.
    pub auto: Option<bool>,
    /// Override the default caption direction.
    pub prepend: Option<bool>,
    /// Override the maximum numbered depth.
    pub auto_level: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rw.toml";

/// Placeholder replaced by the ordinal in a caption prefix.
const PREFIX_PLACEHOLDER: &str = "{}";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Caption configuration.
    pub captions: CaptionsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Caption configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CaptionsConfig {
    /// Number figures with a whole-document pass.
    pub auto: bool,
    /// Prepend captions by default.
    pub prepend: bool,
    /// Maximum numbered depth, `0` for unlimited.
    pub auto_level: usize,
    /// Figure types in registration order.
    pub types: Vec<FigureTypeConfig>,
}

impl Default for CaptionsConfig {
    fn default() -> Self {
        Self {
            auto: true,
            prepend: false,
            auto_level: 0,
            types: vec![
                FigureTypeConfig::new("caption", ""),
                FigureTypeConfig::new("figure-caption", "Figure {}."),
                FigureTypeConfig::new("table-caption", "Table {}."),
            ],
        }
    }
}

/// One `[[captions.types]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FigureTypeConfig {
    /// Type name, also the block name.
    pub name: String,
    /// Prefix template; empty for captions that are never numbered.
    #[serde(default)]
    pub prefix: String,
}

impl FigureTypeConfig {
    /// Create a type entry.
    #[must_use]
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
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
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require an identifier: ASCII letter, then letters, digits, `-` or `_`.
fn require_identifier(value: &str, field: &str) -> Result<(), ConfigError> {
    let mut chars = value.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ConfigError::Validation(format!(
            "{field} '{value}' must start with a letter and contain only letters, digits, '-' or '_'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rw.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to
    /// take precedence over config file values.
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
        } else if let Some(discovered) = Self::discover_config() {
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
        if let Some(auto) = settings.auto {
            self.captions.auto = auto;
        }
        if let Some(prepend) = settings.prepend {
            self.captions.prepend = prepend;
        }
        if let Some(auto_level) = settings.auto_level {
            self.captions.auto_level = auto_level;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
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
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading
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
        self.validate_captions()
    }

    /// Validate caption types.
    fn validate_captions(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for figure_type in &self.captions.types {
            require_non_empty(&figure_type.name, "captions.types.name")?;
            require_identifier(&figure_type.name, "captions.types.name")?;

            if !seen.insert(figure_type.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "captions.types: duplicate type '{}'",
                    figure_type.name
                )));
            }

            let placeholders = figure_type.prefix.matches(PREFIX_PLACEHOLDER).count();
            if !figure_type.prefix.is_empty() && placeholders != 1 {
                return Err(ConfigError::Validation(format!(
                    "captions.types.prefix for '{}' must contain exactly one {PREFIX_PLACEHOLDER}",
                    figure_type.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str) -> Config {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.captions.auto);
        assert!(!config.captions.prepend);
        assert_eq!(config.captions.auto_level, 0);
        assert_eq!(
            config.captions.types,
            vec![
                FigureTypeConfig::new("caption", ""),
                FigureTypeConfig::new("figure-caption", "Figure {}."),
                FigureTypeConfig::new("table-caption", "Table {}."),
            ]
        );
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("");
        assert!(config.captions.auto);
        assert_eq!(config.captions.types.len(), 3);
    }

    #[test]
    fn test_parse_captions_config() {
        let config = parse(
            r#"
[captions]
auto = false
prepend = true
auto_level = 2
"#,
        );
        assert!(!config.captions.auto);
        assert!(config.captions.prepend);
        assert_eq!(config.captions.auto_level, 2);
        assert_eq!(config.captions.types.len(), 3);
    }

    #[test]
    fn test_parse_types_replace_defaults() {
        let config = parse(
            r#"
[[captions.types]]
name = "listing"
prefix = "Listing {}:"

[[captions.types]]
name = "plain"
"#,
        );
        assert_eq!(
            config.captions.types,
            vec![
                FigureTypeConfig::new("listing", "Listing {}:"),
                FigureTypeConfig::new("plain", ""),
            ]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_type_without_name_fails() {
        let result: Result<Config, _> = toml::from_str(
            r#"
[[captions.types]]
prefix = "Figure {}."
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_type_name() {
        let mut config = Config::default();
        config.captions.types = vec![FigureTypeConfig::new("", "Figure {}.")];
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: captions.types.name cannot be empty"
        );
    }

    #[test]
    fn test_validate_type_name_identifier() {
        let mut config = Config::default();
        config.captions.types = vec![FigureTypeConfig::new("2d figure", "Figure {}.")];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("'2d figure'")
        ));
    }

    #[test]
    fn test_validate_duplicate_type() {
        let mut config = Config::default();
        config
            .captions
            .types
            .push(FigureTypeConfig::new("caption", "Caption {}"));
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: captions.types: duplicate type 'caption'"
        );
    }

    #[test]
    fn test_validate_prefix_placeholder() {
        let mut config = Config::default();
        config.captions.types = vec![FigureTypeConfig::new("figure", "Figure")];
        assert!(config.validate().is_err());

        config.captions.types = vec![FigureTypeConfig::new("figure", "Figure {} of {}")];
        assert!(config.validate().is_err());

        config.captions.types = vec![FigureTypeConfig::new("figure", "Fig. {}")];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            auto: Some(false),
            prepend: Some(true),
            auto_level: Some(3),
        });
        assert!(!config.captions.auto);
        assert!(config.captions.prepend);
        assert_eq!(config.captions.auto_level, 3);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = parse("[captions]\nauto_level = 2\n");
        config.apply_cli_settings(&CliSettings::default());
        assert!(config.captions.auto);
        assert_eq!(config.captions.auto_level, 2);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[captions]\nprepend = true\n").unwrap();

        let settings = CliSettings {
            auto_level: Some(1),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert!(config.captions.prepend);
        assert_eq!(config.captions.auto_level, 1);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[captions\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_runs_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[[captions.types]]\nname = \"figure\"\nprefix = \"no placeholder\"\n",
        )
        .unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs").join("guide");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_discover_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_from(&nested),
            Some(nested.join(CONFIG_FILENAME))
        );
    }
}
