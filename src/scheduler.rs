use crate::config::{OutputFormat, SensorConfig};
use crate::errors::SensorResult;
use crate::messages::{Header, TemperatureMessage};
use crate::sensors::SensorDriver;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info};

pub const DEVICE_ID: &str = "mcp9801_monitor";

/// First multiple of `interval` strictly after `now`; both measured from the epoch
pub fn next_boundary(now: Duration, interval: Duration) -> Duration {
    let interval_ns = interval.as_nanos().max(1);
    let now_ns = now.as_nanos();
    let next = now_ns - now_ns % interval_ns + interval_ns;
    Duration::new((next / 1_000_000_000) as u64, (next % 1_000_000_000) as u32)
}

fn since_epoch() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

/// Take one reading and wrap it in a message
pub async fn sample(sensor: &dyn SensorDriver, seq: u64) -> SensorResult<TemperatureMessage> {
    let frame = sensor.read().await?;
    Ok(TemperatureMessage {
        h: Header::new(DEVICE_ID.to_string(), sensor.id().to_string(), seq),
        temperature: frame.temp,
    })
}

pub fn render(message: &TemperatureMessage, output: OutputFormat) -> Result<String, serde_json::Error> {
    match output {
        OutputFormat::Console => Ok(message.console_line()),
        OutputFormat::Json => message.to_json(),
    }
}

/// One wake of a sensor task: read, number and render. A failed read is logged
/// and leaves `seq` untouched so the next successful reading takes its number.
pub async fn poll_once(
    sensor: &dyn SensorDriver,
    seq: &mut u64,
    output: OutputFormat,
) -> Option<String> {
    let message = match sample(sensor, *seq + 1).await {
        Ok(message) => message,
        Err(e) => {
            error!("[{}] Sensor read error: {}", sensor.id(), e);
            return None;
        }
    };
    *seq += 1;

    match render(&message, output) {
        Ok(line) => Some(line),
        Err(e) => {
            error!("[{}] Failed to render reading: {}", sensor.id(), e);
            None
        }
    }
}

/// Spawn one polling task per sensor. Each task wakes on wall-clock multiples of
/// the sensor's interval and reads once per wake.
pub fn spawn_sensor_tasks(
    sensors: Vec<Box<dyn SensorDriver>>,
    sensor_config: &SensorConfig,
) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    for sensor in sensors.into_iter() {
        let sensor_id = sensor.id().to_string();
        let Some(entry) = sensor_config.sensors.iter().find(|s| s.id == sensor_id) else {
            error!("[{}] no configuration entry, not scheduling", sensor_id);
            continue;
        };
        let interval = entry.interval();
        let output = entry.output;
        let mut sequence_counter = 0u64;

        handles.push(tokio::spawn(async move {
            info!("[{}] Starting sensor task every {}s", sensor_id, interval.as_secs());

            loop {
                let now = since_epoch();
                sleep(next_boundary(now, interval) - now).await;

                if let Some(line) = poll_once(sensor.as_ref(), &mut sequence_counter, output).await {
                    println!("{}", line);
                }
            }
        }));
    }

    handles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::MockBus;
    use crate::bus::{shared, SharedBus};
    use crate::sensors::create_sensor_driver;

    #[test]
    fn test_next_boundary_aligns_to_interval() {
        let ten = Duration::from_secs(10);
        assert_eq!(next_boundary(Duration::from_secs(1003), ten), Duration::from_secs(1010));
        assert_eq!(
            next_boundary(Duration::from_millis(1_009_999), ten),
            Duration::from_secs(1010)
        );
        // exactly on a boundary waits for the next one
        assert_eq!(next_boundary(Duration::from_secs(1010), ten), Duration::from_secs(1020));
        assert_eq!(
            next_boundary(Duration::from_secs(59), Duration::from_secs(60)),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_next_boundary_is_never_more_than_one_interval_away() {
        let interval = Duration::from_secs(7);
        for ms in (0..20_000u64).step_by(333) {
            let now = Duration::from_millis(ms);
            let next = next_boundary(now, interval);
            assert!(next > now);
            assert!(next - now <= interval);
            assert_eq!(next.as_nanos() % interval.as_nanos(), 0);
        }
    }

    async fn sensor_reading(word: u16) -> (Box<dyn SensorDriver>, SharedBus<MockBus>) {
        let config = SensorConfig::from_toml_str(
            r#"
            [[sensor]]
            id = "ambient"
            driver = "mcp9801"
            bus = "i2c1"
            "#,
        )
        .unwrap();
        let bus = shared(MockBus::new().with_word(0x00, word));
        let sensor = create_sensor_driver(&config.sensors[0], Some(bus.clone()))
            .await
            .unwrap();
        (sensor, bus)
    }

    #[tokio::test]
    async fn test_sample_builds_message() {
        let (sensor, _bus) = sensor_reading(0xAC04).await;

        let message = sample(sensor.as_ref(), 3).await.unwrap();

        assert_eq!(message.temperature, 4.671875);
        assert_eq!(message.h.sensor_id, "ambient");
        assert_eq!(message.h.device_id, DEVICE_ID);
        assert_eq!(message.h.seq, 3);
    }

    #[tokio::test]
    async fn test_render_formats() {
        let (sensor, _bus) = sensor_reading(0x8019).await;
        let message = sample(sensor.as_ref(), 1).await.unwrap();

        let console = render(&message, OutputFormat::Console).unwrap();
        assert!(console.ends_with("\t25.50 °C"));

        let json = render(&message, OutputFormat::Json).unwrap();
        assert!(json.contains("\"temperature\":25.5"));
        assert!(json.contains("\"sensor_id\":\"ambient\""));
    }

    #[tokio::test]
    async fn test_poll_continues_after_read_error() {
        let (sensor, bus) = sensor_reading(0x8019).await;
        let mut seq = 0u64;

        let first = poll_once(sensor.as_ref(), &mut seq, OutputFormat::Json).await.unwrap();
        assert!(first.contains("\"seq\":1"));

        bus.lock().await.fail = true;
        assert_eq!(poll_once(sensor.as_ref(), &mut seq, OutputFormat::Json).await, None);
        assert_eq!(seq, 1);

        bus.lock().await.fail = false;
        let next = poll_once(sensor.as_ref(), &mut seq, OutputFormat::Json).await.unwrap();
        assert!(next.contains("\"seq\":2"));
        assert!(next.contains("\"temperature\":25.5"));
        assert_eq!(seq, 2);
    }
}
