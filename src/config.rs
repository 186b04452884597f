//! CLI configuration. The codec and object model take no configuration at
//! all; only this glue layer is configurable, loaded with extension
//! sniffing between TOML/YAML/JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default rendering mode for `data_file`/`json_dict` when the CLI
    /// caller doesn't pass `--mode`.
    pub default_mode: DefaultMode,

    /// Default `suggest` score threshold.
    pub suggest_threshold: f64,

    /// Default `count_error` policy for JSON re-import.
    pub count_error: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultMode {
    AsIs,
    Expand,
    Contract,
}

impl From<DefaultMode> for crate::data_object::LineMode {
    fn from(mode: DefaultMode) -> Self {
        match mode {
            DefaultMode::AsIs => crate::data_object::LineMode::AsIs,
            DefaultMode::Expand => crate::data_object::LineMode::Expand,
            DefaultMode::Contract => crate::data_object::LineMode::Contract,
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_mode: DefaultMode::AsIs,
            suggest_threshold: crate::suggest::DEFAULT_THRESHOLD,
            count_error: true,
        }
    }
}

impl CliConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(InventoryError::CodecError)?;
        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| InventoryError::ValueError(format!("invalid YAML config: {e}")))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| InventoryError::ValueError(format!("invalid TOML config: {e}")))?,
            _ => serde_json::from_str(&content)?,
        };
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), InventoryError> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)
                .map_err(|e| InventoryError::ValueError(format!("invalid YAML config: {e}")))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| InventoryError::ValueError(format!("invalid TOML config: {e}")))?,
            _ => serde_json::to_string_pretty(self)?,
        };
        std::fs::write(path, content).map_err(InventoryError::CodecError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_defaults() {
        let cfg = CliConfig::default();
        assert_eq!(cfg.default_mode, DefaultMode::AsIs);
        assert_eq!(cfg.suggest_threshold, 50.0);
        assert!(cfg.count_error);
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = CliConfig {
            suggest_threshold: 75.0,
            ..CliConfig::default()
        };
        cfg.save_to_file(&path).unwrap();
        let loaded = CliConfig::from_file(&path).unwrap();
        assert_eq!(loaded.suggest_threshold, 75.0);
    }
}
