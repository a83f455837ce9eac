//! Daemon runtime: logging, configuration, component wiring and the
//! shutdown path.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::bluetooth::BluealsaService;
use crate::library;
use crate::monitor::MediaMonitor;
use crate::player::Player;
use crate::render::ProcessRenderer;

mod settings;
mod signals;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    let settings = settings::load_settings();
    signals::install();

    let renderer = Arc::new(ProcessRenderer::new(settings.renderer.clone()));
    let bluetooth = Arc::new(BluealsaService::new(settings.bluetooth.clone()));
    let player = Arc::new(Player::new(&settings, renderer, bluetooth));

    let tracks = library::scan(&settings.library.music_dir, &settings.library);
    info!(
        music_dir = %settings.library.music_dir.display(),
        tracks = tracks.len(),
        "music library scanned"
    );

    let _monitor = if settings.media.enabled {
        let monitor = MediaMonitor::spawn(player.clone(), settings.media.clone());
        player.set_mount_handle(monitor.mount_handle());
        Some(monitor)
    } else {
        if settings.playback.autoplay && !player.start() {
            info!("autoplay requested but there is nothing to play yet");
        }
        None
    };

    info!("bluejay ready");
    while !signals::requested() {
        thread::sleep(Duration::from_secs(1));
    }

    info!("shutting down");
    player.shutdown();
    Ok(())
}
