pub mod sensor_config;
pub mod bus_config;

pub use sensor_config::{load_sensor_config, OutputFormat, SensorConfig, SensorEntry};
pub use bus_config::{load_bus_config, BusConfig, BusEntry};

use crate::errors::{ConfigError, ConfigResult};

/// Config directory from CONFIG_PATH, falling back to `config`
pub fn config_dir() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string())
}

fn read_config_file(path: &str) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
        path: path.to_string(),
        source,
    })
}
