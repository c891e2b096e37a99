//! Headless entry point: open a drawing, render one frame, close it.

use chalkboard_app::{AppConfig, AppError, SurfaceHost};
use chalkboard_core::CanvasConfig;
use chalkboard_core::storage::FileStorage;
use std::path::PathBuf;
use std::sync::Arc;

fn main() {
    #[cfg(feature = "native")]
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let doc_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "default".to_string());
    log::info!("Starting Chalkboard for '{}'", doc_id);

    let config = AppConfig {
        canvas: load_canvas_config(),
        ..AppConfig::default()
    };
    let storage = Arc::new(FileStorage::default_location()?);
    log::debug!("Storing drawings in {}", storage.base_path().display());

    let host = SurfaceHost::open(storage, &doc_id, config);
    let summary = host.scene().summary();
    log::info!(
        "Rendered {} commands ({} fills, {} strokes, {} texts) for {} elements",
        host.scene().len(),
        summary.fills,
        summary.strokes,
        summary.texts,
        host.canvas().document.len()
    );
    host.close()
}

/// `CHALKBOARD_CONFIG`, else `<config dir>/chalkboard/config.json`, else defaults.
fn load_canvas_config() -> CanvasConfig {
    let path = std::env::var_os("CHALKBOARD_CONFIG")
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|dir| dir.join("chalkboard").join("config.json")));
    match path {
        Some(path) => CanvasConfig::load_or_default(&path),
        None => {
            log::warn!("No config directory available, using defaults");
            CanvasConfig::default()
        }
    }
}
