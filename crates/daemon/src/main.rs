//! Setlist Remote - Main Entry Point
//! Composition root: wires the engine, transport adapter and console
//! boundary, then runs the control loop until Ctrl+C.

mod config;
mod console;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use setlist_core::application::{JobEngine, RemoteController};
use setlist_core::port::time_provider::SystemTimeProvider;
use setlist_core::port::{InputPort, TimeProvider};
use setlist_infra_http::ReqwestTransport;

use config::Config;
use console::{ConsoleInput, StatusView};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (pretty for development, json for production)
    let log_format = std::env::var("SETLIST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("setlist=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Setlist Remote v{} starting...", VERSION);

    // 2. Load configuration
    let config = Config::from_env().context("loading configuration")?;
    info!(
        base_url = %config.base_url(),
        frame_ms = config.frame_ms,
        "configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let transport = Arc::new(
        ReqwestTransport::new(
            config.base_url(),
            Duration::from_millis(config.http_timeout_ms),
        )
        .context("building HTTP transport")?,
    );

    // 4. Start the engine and the control-loop owner
    let engine = JobEngine::start(transport, time_provider.clone());
    let mut controller = RemoteController::new(engine);

    let mut input = ConsoleInput::spawn();
    let mut view = StatusView::new();

    info!("Ready. Keys: a = previous/confirm, b = play/stop, c = next. Ctrl+C to exit.");

    // 5. Control loop: fixed frame interval, never blocks on network I/O
    let mut frame = tokio::time::interval(Duration::from_millis(config.frame_ms));
    frame.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = frame.tick() => {
                let edges = input.poll_edges();
                let update = controller.tick(time_provider.now_millis(), edges);
                view.render(&controller);
                if update.refresh_status_icons {
                    view.refresh_status_icons(&controller);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received. Exiting gracefully...");
                break;
            }
        }
    }

    // 6. Graceful shutdown: the in-flight job finishes, queued jobs are
    // abandoned.
    controller.shutdown().await;
    info!("Shutdown complete.");

    Ok(())
}
