//! Image sources and background decoding.
//!
//! Every source is read and decoded on its own worker thread. The widget
//! polls the [`TextureLoader`] once per tick and uploads whatever finished,
//! so the surface fills in progressively instead of waiting on the slowest
//! image.

use std::fmt;
use std::fs;
use std::iter;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::RgbaImage;
use serde::Deserialize;

use crate::error::LoadError;

/// Where an image comes from.
///
/// Strings starting with `http://` or `https://` become [`ImageSource::Url`];
/// anything else is treated as a file path.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ImageSource {
    File(PathBuf),
    Url(String),
    /// Encoded image bytes already in memory (PNG, JPEG, ...).
    Memory(Arc<[u8]>),
}

impl ImageSource {
    pub fn memory(bytes: impl Into<Arc<[u8]>>) -> Self {
        ImageSource::Memory(bytes.into())
    }

    /// An empty path, URL, or buffer counts as a missing image.
    pub fn is_empty(&self) -> bool {
        match self {
            ImageSource::File(path) => path.as_os_str().is_empty(),
            ImageSource::Url(url) => url.trim().is_empty(),
            ImageSource::Memory(bytes) => bytes.is_empty(),
        }
    }

    /// Read and decode the image into RGBA8. Blocks; call from a worker.
    pub fn load(&self) -> Result<RgbaImage, LoadError> {
        let decoded = match self {
            ImageSource::File(path) => {
                let bytes = fs::read(path).map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                image::load_from_memory(&bytes)?
            }
            ImageSource::Url(url) => {
                let bytes = reqwest::blocking::get(url.as_str())
                    .and_then(|response| response.error_for_status())
                    .and_then(|response| response.bytes())
                    .map_err(|source| LoadError::Fetch {
                        url: url.clone(),
                        source,
                    })?;
                image::load_from_memory(&bytes)?
            }
            ImageSource::Memory(bytes) => image::load_from_memory(bytes)?,
        };
        Ok(decoded.to_rgba8())
    }
}

impl From<String> for ImageSource {
    fn from(value: String) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            ImageSource::Url(value)
        } else {
            ImageSource::File(PathBuf::from(value))
        }
    }
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        ImageSource::from(value.to_string())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(value: PathBuf) -> Self {
        ImageSource::File(value)
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File(path) => write!(f, "{}", path.display()),
            ImageSource::Url(url) => f.write_str(url),
            ImageSource::Memory(bytes) => write!(f, "<{} bytes in memory>", bytes.len()),
        }
    }
}

/// Identifies which texture a finished load belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Displacement,
    /// Slide texture, index-aligned with the configured image list.
    Slide(usize),
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureKey::Displacement => f.write_str("displacement"),
            TextureKey::Slide(index) => write!(f, "slide #{index}"),
        }
    }
}

/// A finished load, successful or not.
#[derive(Debug)]
pub struct LoadedTexture {
    pub key: TextureKey,
    pub result: Result<RgbaImage, LoadError>,
}

/// Decodes a fixed set of sources on worker threads.
///
/// Loads cannot be cancelled. Dropping the loader discards late results.
pub struct TextureLoader {
    receiver: Receiver<LoadedTexture>,
    pending: usize,
}

impl TextureLoader {
    /// Start loading the displacement map followed by every slide.
    pub fn spawn(displacement: &ImageSource, images: &[ImageSource]) -> Self {
        let (sender, receiver) = mpsc::channel();
        let jobs = iter::once((TextureKey::Displacement, displacement.clone())).chain(
            images
                .iter()
                .cloned()
                .enumerate()
                .map(|(index, source)| (TextureKey::Slide(index), source)),
        );

        let mut pending = 0;
        for (key, source) in jobs {
            let sender = sender.clone();
            let spawned = thread::Builder::new()
                .name(format!("texture-loader ({key})"))
                .spawn(move || {
                    let result = source.load();
                    let _ = sender.send(LoadedTexture { key, result });
                });
            match spawned {
                Ok(_) => pending += 1,
                Err(err) => tracing::warn!(%key, %err, "failed to spawn texture loader"),
            }
        }

        Self { receiver, pending }
    }

    /// Drain every load that finished since the last poll. Never blocks.
    pub fn poll(&mut self) -> Vec<LoadedTexture> {
        let mut finished = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(loaded) => {
                    self.pending = self.pending.saturating_sub(1);
                    finished.push(loaded);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // A worker died without reporting; nothing else will arrive.
                    self.pending = 0;
                    break;
                }
            }
        }
        finished
    }

    /// Number of loads that have not reported yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_finished(&self) -> bool {
        self.pending == 0
    }
}
