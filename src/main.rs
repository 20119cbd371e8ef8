//! Practice Range - headless driver for the weapon core
//!
//! Runs the local player's weapon against a small voxel arena:
//! - Fixed-rate tick loop with scripted trigger, aim sweep and reloads
//! - Hit-scan against blocks and dummy players
//! - Outbound packets tallied instead of sent

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spades_weapons::config::Config;
use spades_weapons::game::catalog::WeaponCatalog;
use spades_weapons::range::{run_session, PracticeRange, SessionEnd};
use spades_weapons::util::rng::ShotRng;
use spades_weapons::util::time::MonotonicClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting practice range");

    let catalog = match &config.weapon_table {
        Some(path) => WeaponCatalog::load(path)
            .with_context(|| format!("loading weapon table {}", path.display()))?,
        None => WeaponCatalog::standard(),
    };

    let rng = ShotRng::new(config.spread_rng, config.rng_seed);
    let mut range = PracticeRange::new(catalog, rng, config.local_player_id, config.weapon)?;

    info!(
        weapon = config.weapon.name(),
        spread_rng = ?config.spread_rng,
        seed = config.rng_seed,
        seconds = config.demo_seconds,
        "Range running"
    );

    let clock = MonotonicClock::new();
    let end = run_session(&mut range, &clock, config.demo_seconds, shutdown_signal()).await?;
    if end == SessionEnd::Interrupted {
        info!(elapsed_ms = clock.elapsed_ms(), "Session interrupted");
    }

    let stats = range.stats();
    info!(stats = %serde_json::to_string(&stats)?, "Session summary");
    for (packet_id, count) in range.packet_summary() {
        info!(packet_id, count, "Packets sent");
    }
    info!(
        ammo = range.player().weapon.ammo(),
        reserve = range.player().weapon.reserve(),
        bytes = range.sink().bytes(),
        "Practice range shutdown complete"
    );
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
