//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config <path>` or `$XDG_CONFIG_HOME/kifu2sgf/kifu2sgf.toml`
//! 3. Environment variables: `KIFU2SGF_*` prefix
//! 4. Command line flags (applied by the CLI layer)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for kifu2sgf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Extension of written records (default: sgf)
    pub output_extension: String,
    /// Directory for converted files (default: next to each input)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Replace existing output files
    pub overwrite: bool,
    /// Text encoding overrides keyed by input extension, e.g. `gib = "utf-8"`
    pub encodings: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_extension: "sgf".into(),
            output_dir: None,
            overwrite: false,
            encodings: BTreeMap::new(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub output_extension: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub overwrite: Option<bool>,
    pub encodings: Option<BTreeMap<String, String>>,
}

/// Get the XDG config directory for kifu2sgf.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kifu2sgf").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("kifu2sgf.toml"))
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

/// Expand `~`, `$VAR` and `${VAR}`, leaving the input untouched on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.output_dir {
            let expanded = expand_env_vars(dir.to_string_lossy().as_ref());
            self.output_dir = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Encodings: per-key union, overlay wins on conflicts
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut encodings = self.encodings.clone();
        if let Some(extra) = &overlay.encodings {
            for (ext, label) in extra {
                encodings.insert(ext.to_ascii_lowercase(), label.clone());
            }
        }
        Self {
            output_extension: overlay
                .output_extension
                .clone()
                .unwrap_or_else(|| self.output_extension.clone()),
            output_dir: overlay
                .output_dir
                .clone()
                .or_else(|| self.output_dir.clone()),
            overwrite: overlay.overwrite.unwrap_or(self.overwrite),
            encodings,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; when `None` the global XDG
    ///   file is used if it exists
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file: an explicit one must exist, the global one may not
        match config_file {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        let raw = load_raw_settings(&global_path)?;
                        current = current.merge_with(&raw);
                    }
                }
            }
        }

        // 3. Apply environment variables (replaces - explicit override)
        current = Self::apply_env_overrides(current)?;

        // Expand ~ and $VAR in path-like fields
        current.expand_paths();

        Ok(current)
    }

    /// Apply KIFU2SGF_* environment variables as explicit overrides.
    ///
    /// `KIFU2SGF_OUTPUT_DIR=/tmp/sgf`, `KIFU2SGF_ENCODINGS__GIB=utf-8`
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("KIFU2SGF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("output_extension") {
            settings.output_extension = val;
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("overwrite") {
            settings.overwrite = val;
        }
        if let Ok(val) = config.get::<BTreeMap<String, String>>("encodings") {
            for (ext, label) in val {
                settings.encodings.insert(ext.to_ascii_lowercase(), label);
            }
        }

        Ok(settings)
    }

    /// Configured encoding label for an input extension, if any.
    pub fn encoding_override(&self, extension: &str) -> Option<&str> {
        self.encodings
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# kifu2sgf configuration
#
# Locations (by precedence, lowest to highest):
#   File: ~/.config/kifu2sgf/kifu2sgf.toml  (or --config <path>)
#   Env:  KIFU2SGF_* environment variables (explicit overrides)
#   CLI:  --output-dir, --force, --extension

# Extension of converted records
# output_extension = "sgf"

# Write all converted records into one directory instead of next to the input
# output_dir = "~/go/sgf"

# Replace records that already exist
# overwrite = false

# Override the legacy text encoding per input extension (WHATWG labels)
[encodings]
# gib = "utf-8"
# ugf = "shift_jis"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
