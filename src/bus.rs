pub mod i2c;

#[cfg(test)]
pub mod mock;

use crate::errors::BusResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Register-level access to devices on a two-wire bus.
///
/// Transfers block until the transport completes; timeouts and retries are
/// the transport's business, not the caller's.
#[async_trait]
pub trait RegisterBus: Send {
    /// Read a 16-bit word from `register`, in the byte order the transport delivers it
    async fn read_word(&mut self, address: u8, register: u8) -> BusResult<u16>;

    /// Write a single byte to `register`
    async fn write_byte(&mut self, address: u8, register: u8, value: u8) -> BusResult<()>;
}

/// A bus handle shared between every driver talking to the same adapter
pub type SharedBus<B> = Arc<Mutex<B>>;

pub fn shared<B: RegisterBus>(bus: B) -> SharedBus<B> {
    Arc::new(Mutex::new(bus))
}

/// Bus type enum for different communication interfaces
#[derive(Debug, Clone, PartialEq)]
pub enum BusType {
    I2C,
}

impl BusType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i2c" => Some(BusType::I2C),
            _ => None,
        }
    }
}
