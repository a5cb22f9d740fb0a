//! CLI configuration.
//!
//! Supports loading configuration from:
//! 1. A YAML configuration file (`--config`)
//! 2. Environment variables (with `DUALRAIL_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values
//!
//! ```yaml
//! converter:
//!   num_qubits: 2
//!   backend_name: sim:local
//!   use_postselection: true
//! source:
//!   g2: 0.01
//! simulator:
//!   max_photons: 8
//! logging:
//!   level: info
//! ```

use std::path::Path;
use std::str::FromStr;

use dualrail_optics::{ConverterConfig, SimulatorConfig, Source};
use serde::{Deserialize, Serialize};

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Converter settings.
    #[serde(default)]
    pub converter: ConverterSection,
    /// Photon-source descriptor forwarded onto converted circuits.
    #[serde(default)]
    pub source: Source,
    /// Reference simulator limits.
    #[serde(default)]
    pub simulator: SimulatorConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Converter settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConverterSection {
    /// Number of qubits; required unless the circuit file states it.
    #[serde(default)]
    pub num_qubits: Option<usize>,
    /// Backend hint copied onto converted circuits.
    #[serde(default)]
    pub backend_name: Option<String>,
    /// Post-select the last CNOT.
    #[serde(default)]
    pub use_postselection: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;
        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `DUALRAIL_*` environment variables into this configuration.
    fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge overrides looked up by variable name.
    ///
    /// Only variables that are set override the file-loaded (or default)
    /// values.
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Converter
        if let Some(v) = lookup("DUALRAIL_NUM_QUBITS") {
            self.converter.num_qubits = Some(parse_var("DUALRAIL_NUM_QUBITS", &v)?);
        }
        if let Some(v) = lookup("DUALRAIL_BACKEND_NAME") {
            self.converter.backend_name = Some(v);
        }
        if let Some(v) = lookup("DUALRAIL_POSTSELECT") {
            self.converter.use_postselection = parse_var("DUALRAIL_POSTSELECT", &v)?;
        }
        // Source
        if let Some(v) = lookup("DUALRAIL_SOURCE_BRIGHTNESS") {
            self.source.brightness = parse_var("DUALRAIL_SOURCE_BRIGHTNESS", &v)?;
        }
        if let Some(v) = lookup("DUALRAIL_SOURCE_G2") {
            self.source.g2 = parse_var("DUALRAIL_SOURCE_G2", &v)?;
        }
        if let Some(v) = lookup("DUALRAIL_SOURCE_INDISTINGUISHABILITY") {
            self.source.indistinguishability =
                parse_var("DUALRAIL_SOURCE_INDISTINGUISHABILITY", &v)?;
        }
        if let Some(v) = lookup("DUALRAIL_SOURCE_TRANSMITTANCE") {
            self.source.transmittance = parse_var("DUALRAIL_SOURCE_TRANSMITTANCE", &v)?;
        }
        // Simulator
        if let Some(v) = lookup("DUALRAIL_MAX_PHOTONS") {
            self.simulator.max_photons = parse_var("DUALRAIL_MAX_PHOTONS", &v)?;
        }
        if let Some(v) = lookup("DUALRAIL_MAX_MODES") {
            self.simulator.max_modes = parse_var("DUALRAIL_MAX_MODES", &v)?;
        }
        // Logging
        if let Some(v) = lookup("DUALRAIL_LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.converter.num_qubits == Some(0) {
            return Err(ConfigError::ValidationError(
                "num_qubits must be greater than 0".to_string(),
            ));
        }
        self.source
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        self.simulator
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }
        Ok(())
    }

    /// Build the library converter configuration.
    pub fn converter_config(&self) -> ConverterConfig {
        let mut config = ConverterConfig::new().with_source(self.source.clone());
        if let Some(n) = self.converter.num_qubits {
            config = config.with_num_qubits(n);
        }
        if let Some(name) = &self.converter.backend_name {
            config = config.with_backend_name(name.clone());
        }
        config
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("Invalid value for {key}: '{value}'")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
