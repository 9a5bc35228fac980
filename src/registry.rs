use crate::bus::i2c::I2CBus;
use crate::bus::{shared, BusType, RegisterBus, SharedBus};
use crate::config::{BusConfig, SensorConfig};
use crate::errors::{BusError, RegistryError, RegistryResult};
use crate::sensors::{create_sensor_driver, SensorDriver};
use std::collections::HashMap;
use tracing::{info, warn};

/// Open every i2c bus listed in the bus config
pub fn open_buses(bus_cfg: &BusConfig) -> RegistryResult<HashMap<String, SharedBus<I2CBus>>> {
    let mut bus_map = HashMap::new();
    for b in bus_cfg.buses.iter() {
        match BusType::from_str(&b.r#type) {
            Some(BusType::I2C) => {
                let bus = I2CBus::new(&b.path).map_err(|e| RegistryError::BusOpenError {
                    bus: b.id.clone(),
                    source: BusError::from(e),
                })?;
                info!("[registry] opened bus id={} path={}", b.id, bus.path());
                bus_map.insert(b.id.clone(), shared(bus));
            }
            None => warn!("[registry] skipping bus '{}': unsupported type '{}'", b.id, b.r#type),
        }
    }
    Ok(bus_map)
}

/// Construct (and thereby reset) every configured sensor, then apply its settings
pub async fn register_sensors<B: RegisterBus + 'static>(
    sensor_config: &SensorConfig,
    buses: &HashMap<String, SharedBus<B>>,
) -> RegistryResult<Vec<Box<dyn SensorDriver>>> {
    let mut sensors: Vec<Box<dyn SensorDriver>> = Vec::new();
    info!("[registry] initializing {} sensors...", sensor_config.sensors.len());
    for s in sensor_config.sensors.iter() {
        if !buses.contains_key(&s.bus) {
            warn!("[registry] sensor '{}' refers to unknown bus '{}'", s.id, s.bus);
        }
        let mut sensor = create_sensor_driver(s, buses.get(&s.bus).cloned())
            .await
            .map_err(RegistryError::DriverCreationError)?;
        info!("[registry] registering sensor: id={} driver={} bus={}", s.id, s.driver, s.bus);

        sensor.init().await.map_err(RegistryError::RegistrationError)?;
        sensors.push(sensor);
    }
    Ok(sensors)
}

pub async fn init_all(
    sensor_config: &SensorConfig,
    bus_config: &BusConfig,
) -> RegistryResult<(Vec<Box<dyn SensorDriver>>, HashMap<String, SharedBus<I2CBus>>)> {
    let bus_map = open_buses(bus_config)?;
    let sensors = register_sensors(sensor_config, &bus_map).await?;
    Ok((sensors, bus_map))
}
