use crate::errors::{ConfigError, ConfigResult};
use crate::sensors::mcp9801::SignDecoding;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// Root configuration struct expecting `[[sensor]]` TOML array format
#[derive(Debug, Deserialize)]
pub struct SensorConfig {
    #[serde(rename = "sensor")]
    pub sensors: Vec<SensorEntry>,
}

/// How readings are written to stdout
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `HH:MM:SS<TAB>21.50 °C`
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

/// One sensor entry, matching each `[[sensor]]` section
#[derive(Debug, Clone, Deserialize)]
pub struct SensorEntry {
    pub id: String,
    pub driver: String,
    pub bus: String,
    /// Device address; the driver default applies when absent
    pub address: Option<u8>,
    /// Resolution mode applied after reset, masked to two bits
    pub resolution: Option<i64>,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub sign_decoding: SignDecoding,
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_interval_secs() -> u64 {
    10
}

impl SensorEntry {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl SensorConfig {
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let parsed: SensorConfig = toml::from_str(content)?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for s in &self.sensors {
            if !seen.insert(s.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate sensor id '{}'",
                    s.id
                )));
            }
            if s.interval_secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("sensor.{}.interval_secs", s.id),
                    reason: "must be at least 1 second".to_string(),
                });
            }
            if let Some(address) = s.address {
                if address > 0x7F {
                    return Err(ConfigError::InvalidValue {
                        field: format!("sensor.{}.address", s.id),
                        reason: format!("{:#04x} is not a 7-bit bus address", address),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Loads config from TOML file
pub fn load_sensor_config(path: &str) -> ConfigResult<SensorConfig> {
    let content = super::read_config_file(path)?;
    SensorConfig::from_toml_str(&content)
}
