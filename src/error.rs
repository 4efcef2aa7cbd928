//! Error types for the graphics and host layers
//!
//! The simulation itself has no failure modes; everything here comes from
//! talking to the browser or the GPU.

use thiserror::Error;

/// Fatal startup failures. The host shows an alert and stops.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("browser window is not available")]
    NoWindow,
    #[error("document is not available")]
    NoDocument,
    #[error("canvas element #{0} not found")]
    CanvasNotFound(String),
    #[error("failed to create rendering surface: {0}")]
    Surface(String),
    #[error("no compatible graphics adapter: {0}")]
    Adapter(String),
    #[error("failed to create graphics device: {0}")]
    Device(String),
}

/// Per-frame presentation failures
#[derive(Debug, Error)]
pub enum RenderError {
    /// Surface must be reconfigured before the next frame
    #[error("surface lost or outdated")]
    SurfaceLost,
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("surface error: {0}")]
    Other(String),
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(err: wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Other(other.to_string()),
        }
    }
}
