pub mod app;
pub mod compositor;
mod config;
pub mod controls;
pub mod error;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod storage;
pub mod store;
pub mod theme;
pub mod ui;
pub use error::{AppError, AppResult};

/// Entrypoint used by the binary and by embedders.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting ScreenGlow");

    let mut app = app::App::new();
    app.start()?;

    tracing::info!(
        export_phase = ?app.coordinator().snapshot().export_phase,
        "session ended"
    );
    Ok(())
}
