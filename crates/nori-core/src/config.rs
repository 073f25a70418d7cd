//! Configuration loading
//!
//! Projects configure the analyzers through a `.nori.toml` file discovered
//! upward from the scanned path:
//!
//! ```toml
//! [rules]
//! "builtin/style/expression-body" = "warn"
//! "builtin/suspicious/condition-always-true" = "off"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::Severity;
use crate::error::NoriError;
use crate::result::Result;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = ".nori.toml";

/// Per-rule setting: a severity override or "off"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetting {
    Off,
    Info,
    Hint,
    Warn,
    Error,
}

impl RuleSetting {
    pub fn severity(self) -> Option<Severity> {
        match self {
            RuleSetting::Off => None,
            RuleSetting::Info => Some(Severity::Info),
            RuleSetting::Hint => Some(Severity::Hint),
            RuleSetting::Warn => Some(Severity::Warning),
            RuleSetting::Error => Some(Severity::Error),
        }
    }
}

/// Analyzer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoriConfig {
    /// Per-rule overrides keyed by rule id
    pub rules: HashMap<String, RuleSetting>,
    /// Glob-free path fragments to skip during discovery
    pub exclude: Vec<String>,
}

impl NoriConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| NoriError::config_error(e.to_string()))
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| NoriError::io_error(path.to_path_buf(), e))?;
        Self::from_toml(&text)
    }

    /// Walk upward from `start` looking for a `.nori.toml`; default
    /// configuration when none is found.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut current = if start.is_dir() {
            Some(start.to_path_buf())
        } else {
            start.parent().map(Path::to_path_buf)
        };

        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!("using configuration from {}", candidate.display());
                return Self::load(&candidate);
            }
            current = dir.parent().map(Path::to_path_buf);
        }

        Ok(Self::default())
    }

    /// Whether a rule is enabled under this configuration.
    pub fn is_enabled(&self, rule_id: &str) -> bool {
        !matches!(self.rules.get(rule_id), Some(RuleSetting::Off))
    }

    /// Effective severity for a rule, given its default.
    pub fn severity_for(&self, rule_id: &str, default: Severity) -> Option<Severity> {
        match self.rules.get(rule_id) {
            Some(setting) => setting.severity(),
            None => Some(default),
        }
    }

    /// Whether a path is excluded from discovery.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        self.exclude.iter().any(|fragment| text.contains(fragment))
    }
}

/// Discover `.cs` files under a set of paths, honoring exclusions.
pub fn discover_files(paths: &[PathBuf], config: &NoriConfig) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            if !config.is_excluded(path) {
                files.push(path.clone());
            }
            continue;
        }
        for entry in walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let entry_path = entry.path();
            if entry.file_type().is_file()
                && entry_path.extension().is_some_and(|ext| ext == "cs")
                && !config.is_excluded(entry_path)
            {
                files.push(entry_path.to_path_buf());
            }
        }
    }
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rule_settings() {
        let config = NoriConfig::from_toml(
            r#"
            [rules]
            "builtin/style/expression-body" = "error"
            "builtin/suspicious/condition-always-false" = "off"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.severity_for("builtin/style/expression-body", Severity::Warning),
            Some(Severity::Error)
        );
        assert!(!config.is_enabled("builtin/suspicious/condition-always-false"));
        assert!(config.is_enabled("builtin/suspicious/condition-always-true"));
        assert_eq!(
            config.severity_for("builtin/suspicious/condition-always-true", Severity::Warning),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn empty_config_is_default() {
        let config = NoriConfig::from_toml("").unwrap();
        assert!(config.rules.is_empty());
        assert!(config.is_enabled("anything"));
    }

    #[test]
    fn bad_setting_is_config_error() {
        let err = NoriConfig::from_toml("[rules]\n\"x\" = \"loud\"").unwrap_err();
        assert!(matches!(err, NoriError::ConfigError { .. }));
    }

    #[test]
    fn discovers_config_upward() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[rules]\n\"builtin/style/expression-body\" = \"off\"\n",
        )
        .unwrap();

        let config = NoriConfig::discover(&nested).unwrap();
        assert!(!config.is_enabled("builtin/style/expression-body"));
    }
}
