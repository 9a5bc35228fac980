use thiserror::Error;
use crate::bus::i2c::I2CError;

/// Failures reported by a register bus transport
#[derive(Error, Debug)]
pub enum BusError {
    #[error("I2C communication failed: {0}")]
    I2c(#[from] I2CError),

    #[error("No response from device {address:#04x} at register {register:#04x}")]
    NoResponse { address: u8, register: u8 },
}

/// Sensor driver errors
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("Sensor configuration error: {0}")]
    Configuration(String),

    #[error("Bus transfer failed: {0}")]
    Bus(#[from] BusError),

    #[error("Sensor '{sensor}' initialization failed: {reason}")]
    InitError { sensor: String, reason: String },

    #[error("Unsupported sensor driver: '{driver}'")]
    UnsupportedDriver { driver: String },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration format: {0}")]
    FormatError(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Registry and initialization errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Sensor registration failed: {0}")]
    RegistrationError(#[source] SensorError),

    #[error("Bus '{bus}' could not be opened: {source}")]
    BusOpenError {
        bus: String,
        #[source]
        source: BusError,
    },

    #[error("Failed to create sensor driver: {0}")]
    DriverCreationError(#[source] SensorError),
}

/// Result type aliases for convenience
pub type BusResult<T> = Result<T, BusError>;
pub type SensorResult<T> = Result<T, SensorError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type RegistryResult<T> = Result<T, RegistryError>;
