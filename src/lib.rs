// Public modules
pub mod bus;
pub mod config;
pub mod errors;
pub mod messages;
pub mod registry;
pub mod scheduler;
pub mod sensors;

// Re-export commonly used types
pub use bus::{RegisterBus, SharedBus};
pub use config::{load_bus_config, load_sensor_config, SensorConfig};
pub use errors::{BusError, SensorError, SensorResult};
pub use registry::init_all;
pub use scheduler::spawn_sensor_tasks;
pub use sensors::mcp9801::{Mcp9801, Resolution, SignDecoding};

use tracing::info;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` directives when present and valid, `info` otherwise
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Initialize tracing with default configuration
pub fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();
}

/// Run the monitor with the given configuration directory until Ctrl-C
pub async fn run_monitor(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("[mcp9801-monitor] starting up...");

    let sensor_config = load_sensor_config(&format!("{}/sensors.toml", config_path))?;
    info!("[config] loaded {} sensor(s)", sensor_config.sensors.len());
    let bus_config = load_bus_config(&format!("{}/buses.toml", config_path))?;
    info!("[config] loaded {} bus(es)", bus_config.buses.len());

    // Buses stay open for as long as the tasks run
    let (sensors, _buses) = init_all(&sensor_config, &bus_config).await?;
    info!("[registry] sensors and buses initialized");

    let tasks = spawn_sensor_tasks(sensors, &sensor_config);
    info!("[main] {} sensor task(s) launched", tasks.len());

    tokio::signal::ctrl_c().await?;
    for task in tasks.iter() {
        task.abort();
    }
    println!();
    info!("[main] interrupted, shutting down");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(log_filter(Some("warn")).to_string(), "warn");
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
    }
}
