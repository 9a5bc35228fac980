use crate::bus::{RegisterBus, SharedBus};
use crate::config::SensorEntry;
use crate::errors::{SensorError, SensorResult};
use async_trait::async_trait;

pub mod mcp9801;

/// One sample produced by a sensor
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SensorDataFrame {
    /// Temperature (°C)
    pub temp: f32,
}

#[async_trait]
pub trait SensorDriver: Send + Sync {
    /// Apply configured settings after construction
    async fn init(&mut self) -> SensorResult<()>;
    async fn read(&self) -> SensorResult<SensorDataFrame>;
    fn id(&self) -> &str;
    fn bus(&self) -> &str;
}

/// Build the driver named by `entry.driver`. `bus` is `None` when the entry
/// refers to a bus that was never opened.
pub async fn create_sensor_driver<B: RegisterBus + 'static>(
    entry: &SensorEntry,
    bus: Option<SharedBus<B>>,
) -> SensorResult<Box<dyn SensorDriver>> {
    match entry.driver.as_str() {
        "mcp9801" => Ok(Box::new(mcp9801::Mcp9801Sensor::new(entry, bus).await?)),
        _ => Err(SensorError::UnsupportedDriver {
            driver: entry.driver.clone(),
        }),
    }
}
