use serde::{Deserialize, Serialize};

/// Header metadata common to all sensor messages
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Header {
    /// Unique device identifier
    pub device_id: String,
    /// Sensor identifier from the config (e.g. "ambient")
    pub sensor_id: String,
    /// Sequence number for message ordering
    pub seq: u64,
    /// UTC timestamp in nanoseconds
    pub t_utc_ns: u64,
    /// Message schema version for evolution
    pub schema_v: u16,
}

impl Header {
    /// Create a new header stamped with the current time
    pub fn new(device_id: String, sensor_id: String, seq: u64) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let now_utc = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;

        Self {
            device_id,
            sensor_id,
            seq,
            t_utc_ns: now_utc,
            schema_v: 1,
        }
    }

    /// `HH:MM:SS` of the timestamp, UTC
    pub fn time_of_day(&self) -> String {
        let secs = self.t_utc_ns / 1_000_000_000 % 86_400;
        format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
    }
}

/// Temperature sample
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TemperatureMessage {
    pub h: Header,
    /// Temperature (°C)
    pub temperature: f32,
}

impl TemperatureMessage {
    /// Console line: time of day, tab, temperature to two decimals
    pub fn console_line(&self) -> String {
        format!("{}\t{:.2} °C", self.h.time_of_day(), self.temperature)
    }

    /// Serialize to a single-line JSON object
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
