use super::{SensorDataFrame, SensorDriver};
use crate::bus::{RegisterBus, SharedBus};
use crate::config::SensorEntry;
use crate::errors::{BusResult, SensorError, SensorResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// MCP9801 register pointers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    AmbientTemperature = 0x00,
    Config = 0x01,
    TempHysteresis = 0x02,
    TempLimit = 0x03,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

pub const DEFAULT_ADDRESS: u8 = 0x4F;
pub const VALID_ADDRESSES: &[u8] = &[DEFAULT_ADDRESS];

/// Configuration written on reset: 12-bit resolution, everything else cleared
pub const CONFIG_DEFAULT: u8 = 0x60;

const RESOLUTION_MASK: u8 = 0b0110_0000;
const RESOLUTION_SHIFT: u8 = 5;
const SIGN_BIT: u16 = 0x8000;

/// ADC resolution, config register bits 5-6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Resolution {
    /// 9 bit, 0.5 °C
    Bits9 = 0,
    /// 10 bit, 0.25 °C
    Bits10 = 1,
    /// 11 bit, 0.125 °C
    Bits11 = 2,
    /// 12 bit, 0.0625 °C
    Bits12 = 3,
}

impl Resolution {
    /// Only the two low bits of `mode` are significant
    pub fn from_bits(mode: i64) -> Self {
        match mode & 0x03 {
            0 => Resolution::Bits9,
            1 => Resolution::Bits10,
            2 => Resolution::Bits11,
            _ => Resolution::Bits12,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Temperature step of one LSB
    pub fn step_celsius(self) -> f32 {
        0.5 / (1u8 << self.bits()) as f32
    }

    /// Typical time for one conversion at this resolution
    pub fn conversion_time(self) -> Duration {
        match self {
            Resolution::Bits9 => Duration::from_millis(30),
            Resolution::Bits10 => Duration::from_millis(60),
            Resolution::Bits11 => Duration::from_millis(120),
            Resolution::Bits12 => Duration::from_millis(250),
        }
    }
}

impl From<i64> for Resolution {
    fn from(mode: i64) -> Self {
        Resolution::from_bits(mode)
    }
}

/// How a temperature word with the sign bit set is turned into a value.
///
/// `BiasSubtraction` clears the sign bit and keeps the rest as a positive
/// magnitude, which is wrong below 0 °C. `TwosComplement` follows the datasheet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignDecoding {
    #[default]
    BiasSubtraction,
    TwosComplement,
}

/// Exchange the two octets of a bus word
pub fn swap_bytes(word: u16) -> u16 {
    word.swap_bytes()
}

/// Convert an ambient temperature word, as delivered by the bus, into °C
pub fn decode_temperature(raw: u16, decoding: SignDecoding) -> f32 {
    let word = swap_bytes(raw);
    let value: i32 = if word & SIGN_BIT == 0 {
        word as i32
    } else {
        match decoding {
            SignDecoding::BiasSubtraction => (word - SIGN_BIT) as i32,
            SignDecoding::TwosComplement => word as i16 as i32,
        }
    };
    value as f32 / 256.0
}

/// Protocol driver for one MCP9801 on a shared bus
pub struct Mcp9801<B> {
    bus: SharedBus<B>,
    address: u8,
    decoding: SignDecoding,
}

impl<B: RegisterBus> Mcp9801<B> {
    /// Bind to the sensor at `address` (default 0x4F) and reset its configuration
    pub async fn new(bus: Option<SharedBus<B>>, address: Option<u8>) -> SensorResult<Self> {
        Self::with_sign_decoding(bus, address, SignDecoding::default()).await
    }

    /// Like `new`, choosing how words with the sign bit set are decoded
    pub async fn with_sign_decoding(
        bus: Option<SharedBus<B>>,
        address: Option<u8>,
        decoding: SignDecoding,
    ) -> SensorResult<Self> {
        let bus = bus.ok_or_else(|| {
            SensorError::Configuration("MCP9801 requires a register bus".to_string())
        })?;
        let address = address.unwrap_or(DEFAULT_ADDRESS);
        if !VALID_ADDRESSES.contains(&address) {
            warn!(
                "[mcp9801] address {:#04x} is not a known MCP9801 address, using it anyway",
                address
            );
        }

        let sensor = Self { bus, address, decoding };
        sensor.reset().await?;
        Ok(sensor)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn sign_decoding(&self) -> SignDecoding {
        self.decoding
    }

    /// Restore the default configuration (12-bit resolution)
    pub async fn reset(&self) -> BusResult<()> {
        let mut bus = self.bus.lock().await;
        bus.write_byte(self.address, Register::Config.addr(), CONFIG_DEFAULT)
            .await
    }

    pub async fn read_temperature(&self) -> BusResult<f32> {
        let raw = {
            let mut bus = self.bus.lock().await;
            bus.read_word(self.address, Register::AmbientTemperature.addr())
                .await?
        };
        let temp = decode_temperature(raw, self.decoding);
        debug!("[mcp9801] raw={:#06x} temp={}", raw, temp);
        Ok(temp)
    }

    pub async fn get_resolution(&self) -> BusResult<Resolution> {
        let mut bus = self.bus.lock().await;
        let config = read_config(&mut *bus, self.address).await?;
        Ok(Resolution::from_bits(
            ((config & RESOLUTION_MASK) >> RESOLUTION_SHIFT) as i64,
        ))
    }

    /// Read-modify-write of the resolution bits. The bus stays locked
    /// between the read and the write.
    pub async fn set_resolution(&self, mode: impl Into<Resolution>) -> BusResult<()> {
        let resolution = mode.into();
        let mut bus = self.bus.lock().await;
        let config = read_config(&mut *bus, self.address).await?;
        let config = (config & !RESOLUTION_MASK) | (resolution.bits() << RESOLUTION_SHIFT);
        bus.write_byte(self.address, Register::Config.addr(), config)
            .await
    }
}

/// The config register is 8 bits wide; a word read carries it in the first byte
async fn read_config<B: RegisterBus>(bus: &mut B, address: u8) -> BusResult<u8> {
    let word = bus.read_word(address, Register::Config.addr()).await?;
    Ok((word & 0x00FF) as u8)
}

/// Registry adapter: one configured MCP9801 sensor
pub struct Mcp9801Sensor<B> {
    id: String,
    bus_id: String,
    driver: Mcp9801<B>,
    resolution: Option<Resolution>,
}

impl<B: RegisterBus> Mcp9801Sensor<B> {
    pub async fn new(entry: &SensorEntry, bus: Option<SharedBus<B>>) -> SensorResult<Self> {
        let driver = Mcp9801::with_sign_decoding(bus, entry.address, entry.sign_decoding).await?;
        Ok(Self {
            id: entry.id.clone(),
            bus_id: entry.bus.clone(),
            driver,
            resolution: entry.resolution.map(Resolution::from_bits),
        })
    }
}

#[async_trait]
impl<B: RegisterBus + 'static> SensorDriver for Mcp9801Sensor<B> {
    async fn init(&mut self) -> SensorResult<()> {
        let Some(resolution) = self.resolution else {
            return Ok(());
        };

        self.driver
            .set_resolution(resolution)
            .await
            .map_err(|e| SensorError::InitError {
                sensor: self.id.clone(),
                reason: format!("Failed to set resolution: {}", e),
            })?;
        info!(
            "[{}] resolution set to {} bit ({} °C)",
            self.id,
            resolution.bits() + 9,
            resolution.step_celsius()
        );
        Ok(())
    }

    async fn read(&self) -> SensorResult<SensorDataFrame> {
        let temp = self.driver.read_temperature().await?;
        Ok(SensorDataFrame { temp })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn bus(&self) -> &str {
        &self.bus_id
    }
}
