//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treesites/treesites.toml`
//! 3. Environment variables: `TREESITES_*` prefix
//! 4. Command line flags (applied by the CLI layer)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{LeafShape, MatchMode};

/// Raw leaf shape for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLeafShape {
    pub group_tag: Option<String>,
    pub marker_tag: Option<String>,
    pub label_tag: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub match_color: Option<String>,
    pub selected_color: Option<String>,
    pub query_field_id: Option<String>,
    pub match_mode: Option<MatchMode>,
    pub leaf: RawLeafShape,
}

/// Unified configuration for treesites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Fill color for labels matched by a search (default: blue)
    pub match_color: String,
    /// Fill color for a clicked leaf's label (default: red)
    pub selected_color: String,
    /// Element id of the query input field (default: query)
    pub query_field_id: String,
    /// How queries are matched against labels (default: literal)
    pub match_mode: MatchMode,
    /// Tag names that make up a leaf group
    pub leaf: LeafShape,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            match_color: "blue".into(),
            selected_color: "red".into(),
            query_field_id: "query".into(),
            match_mode: MatchMode::Literal,
            leaf: LeafShape::default(),
        }
    }
}

/// Get the XDG config directory for treesites.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treesites").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treesites.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let leaf = &overlay.leaf;
        Self {
            match_color: overlay
                .match_color
                .clone()
                .unwrap_or_else(|| self.match_color.clone()),
            selected_color: overlay
                .selected_color
                .clone()
                .unwrap_or_else(|| self.selected_color.clone()),
            query_field_id: overlay
                .query_field_id
                .clone()
                .unwrap_or_else(|| self.query_field_id.clone()),
            match_mode: overlay.match_mode.unwrap_or(self.match_mode),
            leaf: LeafShape {
                group_tag: leaf
                    .group_tag
                    .clone()
                    .unwrap_or_else(|| self.leaf.group_tag.clone()),
                marker_tag: leaf
                    .marker_tag
                    .clone()
                    .unwrap_or_else(|| self.leaf.marker_tag.clone()),
                label_tag: leaf
                    .label_tag
                    .clone()
                    .unwrap_or_else(|| self.leaf.label_tag.clone()),
            },
        }
    }

    /// Load settings from the global config location.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional TOML file layered over the defaults; a
    ///   missing file is not an error
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file
        if let Some(path) = config_file {
            if path.exists() {
                debug!("loading config from {}", path.display());
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Environment variables
        current = Self::apply_env_overrides(current)?;

        Ok(current)
    }

    /// Apply TREESITES_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREESITES")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;
        Self::apply_overrides(settings, &config)
    }

    /// Apply individual keys from a `config` source if set.
    pub fn apply_overrides(mut settings: Self, config: &Config) -> Result<Self, ApplicationError> {
        if let Ok(val) = config.get_string("match_color") {
            settings.match_color = val;
        }
        if let Ok(val) = config.get_string("selected_color") {
            settings.selected_color = val;
        }
        if let Ok(val) = config.get_string("query_field_id") {
            settings.query_field_id = val;
        }
        if let Ok(val) = config.get_string("match_mode") {
            settings.match_mode = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("leaf.group_tag") {
            settings.leaf.group_tag = val;
        }
        if let Ok(val) = config.get_string("leaf.marker_tag") {
            settings.leaf.marker_tag = val;
        }
        if let Ok(val) = config.get_string("leaf.label_tag") {
            settings.leaf.label_tag = val;
        }
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treesites configuration
#
# Location: ~/.config/treesites/treesites.toml
# Env:      TREESITES_* environment variables override this file,
#           nested keys use a double underscore (TREESITES_LEAF__MARKER_TAG)

# Fill color for labels matched by `search`
# match_color = "blue"

# Fill color for the label of a clicked leaf
# selected_color = "red"

# Element id of the search input field
# query_field_id = "query"

# "literal" (substring) or "pattern" (regular expression)
# match_mode = "literal"

# A leaf is a <group_tag> with exactly two children: <marker_tag> then <label_tag>
[leaf]
# group_tag = "g"
# marker_tag = "circle"
# label_tag = "text"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None).unwrap();
        assert_eq!(settings.match_color, "blue");
        assert_eq!(settings.selected_color, "red");
        assert_eq!(settings.query_field_id, "query");
        assert_eq!(settings.leaf, LeafShape::default());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified() {
        let raw: RawSettings = toml::from_str(
            r#"
match_color = "green"
[leaf]
marker_tag = "rect"
"#,
        )
        .unwrap();
        let merged = Settings::default().merge_with(&raw);
        assert_eq!(merged.match_color, "green");
        assert_eq!(merged.selected_color, "red");
        assert_eq!(merged.leaf.marker_tag, "rect");
        assert_eq!(merged.leaf.label_tag, "text");
    }

    #[test]
    fn given_overrides_when_applied_then_replace_values() {
        let config = Config::builder()
            .set_override("selected_color", "orange")
            .unwrap()
            .set_override("match_mode", "pattern")
            .unwrap()
            .set_override("leaf.label_tag", "tspan")
            .unwrap()
            .build()
            .unwrap();
        let settings = Settings::apply_overrides(Settings::default(), &config).unwrap();
        assert_eq!(settings.selected_color, "orange");
        assert_eq!(settings.match_mode, MatchMode::Pattern);
        assert_eq!(settings.leaf.label_tag, "tspan");
        assert_eq!(settings.match_color, "blue");
    }

    #[test]
    fn given_bad_match_mode_override_when_applied_then_config_error() {
        let config = Config::builder()
            .set_override("match_mode", "fuzzy")
            .unwrap()
            .build()
            .unwrap();
        let err = Settings::apply_overrides(Settings::default(), &config).unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }

    #[test]
    fn given_settings_when_to_toml_then_roundtrips() {
        let toml_str = Settings::default().to_toml().unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
