use crate::bus::RegisterBus;
use crate::errors::{BusError, BusResult};
use async_trait::async_trait;

#[cfg(target_os = "linux")]
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
#[cfg(target_os = "linux")]
use i2cdev::core::I2CDevice;

/// I2C bus error type - platform specific
#[cfg(target_os = "linux")]
pub type I2CError = LinuxI2CError;

#[cfg(not(target_os = "linux"))]
#[derive(Debug)]
pub struct I2CError(String);

#[cfg(not(target_os = "linux"))]
impl std::fmt::Display for I2CError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "I2C not supported on this platform: {}", self.0)
    }
}

#[cfg(not(target_os = "linux"))]
impl std::error::Error for I2CError {}

/// SMBus adapter behind a `/dev/i2c-N` character device
#[cfg(target_os = "linux")]
pub struct I2CBus {
    device: LinuxI2CDevice,
    path: String,
}

#[cfg(not(target_os = "linux"))]
pub struct I2CBus {
    path: String,
}

impl I2CBus {
    /// Device path this bus was opened from
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(target_os = "linux")]
impl I2CBus {
    pub fn new(path: &str) -> Result<Self, I2CError> {
        let device = LinuxI2CDevice::new(path, 0)?;
        Ok(Self {
            device,
            path: path.to_string(),
        })
    }
}

// errno values the i2c-dev driver reports when nothing acknowledges
#[cfg(target_os = "linux")]
const ENXIO: i32 = 6;
#[cfg(target_os = "linux")]
const EREMOTEIO: i32 = 121;

/// Map a failed transfer, singling out a missing acknowledge
#[cfg(target_os = "linux")]
fn transfer_error(e: LinuxI2CError, address: u8, register: u8) -> BusError {
    match e {
        LinuxI2CError::Errno(errno) if errno == ENXIO || errno == EREMOTEIO => {
            BusError::NoResponse { address, register }
        }
        other => BusError::I2c(other),
    }
}

#[cfg(target_os = "linux")]
#[async_trait]
impl RegisterBus for I2CBus {
    async fn read_word(&mut self, address: u8, register: u8) -> BusResult<u16> {
        self.device.set_slave_address(address as u16)?;
        // SMBus words arrive low byte first
        self.device
            .smbus_read_word_data(register)
            .map_err(|e| transfer_error(e, address, register))
    }

    async fn write_byte(&mut self, address: u8, register: u8, value: u8) -> BusResult<()> {
        self.device.set_slave_address(address as u16)?;
        self.device
            .smbus_write_byte_data(register, value)
            .map_err(|e| transfer_error(e, address, register))
    }
}

#[cfg(not(target_os = "linux"))]
impl I2CBus {
    pub fn new(path: &str) -> Result<Self, I2CError> {
        Err(I2CError(format!("cannot open '{}': I2C is only supported on Linux", path)))
    }
}

#[cfg(not(target_os = "linux"))]
#[async_trait]
impl RegisterBus for I2CBus {
    async fn read_word(&mut self, _address: u8, _register: u8) -> BusResult<u16> {
        Err(I2CError("I2C is only supported on Linux".to_string()).into())
    }

    async fn write_byte(&mut self, _address: u8, _register: u8, _value: u8) -> BusResult<()> {
        Err(I2CError("I2C is only supported on Linux".to_string()).into())
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_acknowledge_is_no_response() {
        for errno in [ENXIO, EREMOTEIO] {
            assert!(matches!(
                transfer_error(LinuxI2CError::Errno(errno), 0x4F, 0x00),
                BusError::NoResponse { address: 0x4F, register: 0x00 }
            ));
        }
    }

    #[test]
    fn test_other_failures_stay_i2c_errors() {
        // EIO
        assert!(matches!(
            transfer_error(LinuxI2CError::Errno(5), 0x4F, 0x01),
            BusError::I2c(LinuxI2CError::Errno(5))
        ));
    }
}
