//! Crate error types
//!
//! Fatal build conditions (no adapter, no device, no surface) and the
//! reported-but-recoverable screenshot failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleyError {
    #[error("no compatible graphics adapter available")]
    AdapterUnavailable,

    #[error("failed to acquire graphics device: {0}")]
    DeviceUnavailable(#[from] wgpu::RequestDeviceError),

    #[error("failed to create rendering surface: {0}")]
    SurfaceUnavailable(#[from] wgpu::CreateSurfaceError),

    #[error("screenshot unavailable: renderer or scene not ready")]
    ScreenshotUnavailable,

    #[error("screenshot readback failed: {0}")]
    ScreenshotReadback(String),

    #[error("screenshot encoding failed: {0}")]
    ScreenshotEncoding(#[from] image::ImageError),

    #[error("screenshot write failed: {0}")]
    ScreenshotIo(#[from] std::io::Error),
}
