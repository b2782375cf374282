//! Configuration management
//!
//! Optional `config.toml` with three sections:
//! - `[decoder]` table profile and fallback port
//! - `[output]` report formatting
//! - `[devices]` device EUI -> display name
//!
//! Every section and key may be omitted.

use crate::error::{Error, Result};
use crate::format::Profile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// =============================================================================
// Application Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decoder: DecoderConfig,
    pub output: OutputConfig,
    pub devices: DeviceNames,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Table variant set ("strict" or "legacy")
    pub profile: Profile,
    /// Port assumed for payloads given without one
    pub default_port: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON reports
    pub pretty: bool,
    /// Attach the format metadata block to each report
    pub include_metadata: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            include_metadata: true,
        }
    }
}

// =============================================================================
// Device names
// =============================================================================

/// Read-only device EUI -> display name directory
///
/// EUIs are matched case-insensitively, ignoring `-` and `:` separators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct DeviceNames {
    names: BTreeMap<String, String>,
}

impl DeviceNames {
    pub fn resolve(&self, eui: &str) -> Option<&str> {
        self.names.get(&normalize_eui(eui)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn validate(&self) -> Result<()> {
        for (eui, name) in &self.names {
            if eui.is_empty() || !eui.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(Error::ConfigValidation {
                    field: "devices",
                    reason: format!("'{}' is not a hex EUI", eui),
                });
            }
            if name.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    field: "devices",
                    reason: format!("empty name for {}", eui),
                });
            }
        }
        Ok(())
    }
}

impl From<BTreeMap<String, String>> for DeviceNames {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self {
            names: map
                .into_iter()
                .map(|(eui, name)| (normalize_eui(&eui), name))
                .collect(),
        }
    }
}

impl From<DeviceNames> for BTreeMap<String, String> {
    fn from(devices: DeviceNames) -> Self {
        devices.names
    }
}

fn normalize_eui(eui: &str) -> String {
    eui.chars()
        .filter(|c| !matches!(c, '-' | ':'))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// =============================================================================
// Loading
// =============================================================================

impl Config {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        info!(
            path = %path.display(),
            profile = ?config.decoder.profile,
            devices = config.devices.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        // Port 0 carries MAC commands, never application data
        if self.decoder.default_port == Some(0) {
            return Err(Error::ConfigValidation {
                field: "decoder.default_port",
                reason: "must be between 1 and 255".into(),
            });
        }

        self.devices.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.decoder.profile, Profile::Strict);
        assert!(config.output.include_metadata);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_config_full_file() {
        let toml_str = r#"
            [decoder]
            profile = "legacy"
            default_port = 1

            [output]
            pretty = true
            include_metadata = false

            [devices]
            "00-02-CC-01-00-00-01-2A" = "Garden north"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();

        assert_eq!(config.decoder.profile, Profile::Legacy);
        assert_eq!(config.decoder.default_port, Some(1));
        assert!(config.output.pretty);
        assert!(!config.output.include_metadata);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_device_names_normalized() {
        let config: Config = toml::from_str(
            r#"
            [devices]
            "00-02-cc-01-00-00-01-2a" = "Garden north"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.devices.resolve("0002CC010000012A"),
            Some("Garden north")
        );
        assert_eq!(
            config.devices.resolve("00:02:CC:01:00:00:01:2A"),
            Some("Garden north")
        );
        assert_eq!(config.devices.resolve("0002CC010000012B"), None);
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
            [decoder]
            profile = "lenient"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.decoder.default_port = Some(0);
        assert!(config.validate().is_err());
        config.decoder.default_port = Some(2);
        assert!(config.validate().is_ok());

        let devices: BTreeMap<String, String> =
            [("not-an-eui".to_string(), "x".to_string())].into();
        config.devices = devices.into();
        assert!(config.validate().is_err());

        let devices: BTreeMap<String, String> =
            [("0002CC01".to_string(), "  ".to_string())].into();
        config.devices = devices.into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialize_deserialize_roundtrip() {
        let mut config = Config::default();
        config.decoder.profile = Profile::Legacy;
        config.output.pretty = true;
        config.devices = BTreeMap::from([("0002cc01".to_string(), "Shed".to_string())]).into();

        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/catena.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_load_optional_defaults() {
        assert_eq!(Config::load_optional(None).unwrap(), Config::default());
    }
}
