mod app;
mod config;

use anyhow::{Context, Result};
use trigon_engine::device::GpuInit;
use trigon_engine::logging::{LoggingConfig, init_logging};
use trigon_engine::shader::interface;
use trigon_engine::window::{Runtime, RuntimeConfig};

use crate::app::TriangleApp;
use crate::config::DemoConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = DemoConfig::from_env()?;

    // Catch layout mismatches before any window or device exists.
    interface::validate_all().context("shader interface check failed")?;

    log::info!("starting with `{}`; Space cycles shaders, Esc quits", config.variant);

    Runtime::run(
        RuntimeConfig {
            title: format!("trigon: {}", config.variant),
            ..Default::default()
        },
        GpuInit::default(),
        TriangleApp::new(config.variant),
    )
}
