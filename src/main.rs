pub mod config;
pub mod engine;
pub mod feed;
pub mod input;

use crate::config::EngineConfig;
use crate::engine::NavigatorHandle;
use crate::feed::VirtualFeed;
use color_eyre::{eyre::eyre, Result};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    if let Err(e) = EngineConfig::ensure_default_config() {
        warn!("Could not write default config: {}", e);
    }
    let config = EngineConfig::load_or_default();

    // Demo page: a simulated feed standing in for a real page adapter.
    let feed = VirtualFeed::new(200);

    info!("Starting navigator against simulated feed");
    let mut handle = NavigatorHandle::spawn(config, feed)
        .map_err(|e| eyre!("Failed to spawn navigator: {}", e))?;

    info!("Navigator running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    handle
        .shutdown()
        .await
        .map_err(|e| eyre!("Failed to shut down navigator: {}", e))?;
    info!("Navigator stopped");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
