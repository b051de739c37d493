//! Error types for slider construction, configuration, and texture loading.

use std::path::PathBuf;

/// Errors raised while reading or resolving [`SliderOptions`](crate::SliderOptions).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors that prevent a slider from being constructed or rendered.
#[derive(Debug, thiserror::Error)]
pub enum SliderError {
    #[error("one or more images are missing (at least two non-empty sources are required)")]
    MissingImages,
    #[error("displacement image is missing")]
    MissingDisplacement,
    #[error("container surface is missing")]
    MissingContainer,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported texture formats")]
    UnsupportedSurface,
    #[error("event loop failure: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),
}

/// Errors raised by a single texture load.
///
/// These never abort the slider; the affected slot keeps its placeholder.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
