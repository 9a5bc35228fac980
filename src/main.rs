use mcp9801_monitor::config::config_dir;
use mcp9801_monitor::{init_tracing, run_monitor};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug for raw register values, RUST_LOG=warn for quiet output
    init_tracing();

    let config_path = config_dir();
    tracing::info!("[main] Configuration path: {}", config_path);

    run_monitor(&config_path).await
}
