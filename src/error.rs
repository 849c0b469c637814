//! Error types for kaleida.
//!
//! This module provides error types for GPU initialization, frame readback,
//! and image export. The simulation core itself never fails: pool exhaustion
//! throttles emission and out-of-range configuration clamps, so only the
//! rendering and export paths carry a `Result`.

use std::fmt;

/// Errors that can occur while rendering or exporting frames.
#[derive(Debug)]
pub enum RenderError {
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Failed to map buffer for reading.
    BufferMapping(String),
    /// Failed to encode the output image.
    ImageEncode(image::ImageError),
    /// Failed to write the output file.
    Io(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            RenderError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            RenderError::BufferMapping(msg) => write!(f, "Failed to map GPU buffer: {}", msg),
            RenderError::ImageEncode(e) => write!(f, "Failed to encode image: {}", e),
            RenderError::Io(e) => write!(f, "Failed to write output file: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::DeviceCreation(e) => Some(e),
            RenderError::ImageEncode(e) => Some(e),
            RenderError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderError::DeviceCreation(e)
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::ImageEncode(e)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}
