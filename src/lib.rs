// src/lib.rs
//! Galley — an interactive 3D kitchen scene viewer and configurator
//!
//! Procedurally builds a kitchen room and its furnishings, renders them in
//! real time on wgpu, and exposes live configuration: per-category recoloring,
//! a quality setting driving mesh tessellation, an antialiasing toggle and
//! PNG screenshot capture.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod performance;
pub mod session;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::GalleyApp;
pub use config::{CategoryColors, MaterialCategory, RoomConfig};
pub use error::GalleyError;

/// Creates a default Galley application instance
pub fn default() -> Result<GalleyApp, winit::error::EventLoopError> {
    GalleyApp::new()
}
