use anyhow::{Context, Result};
use hotel_reservations::{HotelConfig, ReservationManager, Shell};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with the menu
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = HotelConfig::load(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("loading config from {}", path.display()),
        None => "loading config".to_string(),
    })?;

    info!(?config, "starting hotel reservation shell");

    let mut manager = ReservationManager::from_config(&config).with_context(|| {
        format!(
            "loading saved state from {} and {}",
            config.rooms_file.display(),
            config.reservations_file.display()
        )
    })?;

    let stdin = io::stdin();
    Shell::new(&mut manager, stdin.lock(), io::stdout())
        .run()
        .context("interactive shell failed")?;

    Ok(())
}
