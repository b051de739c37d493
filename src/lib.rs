//! # Shader Slider
//!
//! **An image slider that crossfades through a displacement map.**
//!
//! Each transition warps the outgoing and incoming slides by a displacement
//! texture, rotated separately for each side, while blending one into the
//! other on a single full-surface plane.
//!
//! ## Quick Start
//!
//! ```no_run
//! use shader_slider::{AppConfig, Easing, SliderOptions};
//!
//! fn main() -> Result<(), shader_slider::SliderError> {
//!     let options = SliderOptions::new()
//!         .images(["slides/one.jpg", "slides/two.jpg", "slides/three.jpg"])
//!         .displacement("maps/swirl.png")
//!         .intensity(0.3)
//!         .duration(1.4)
//!         .easing(Easing::ExpoOut)
//!         .autoplay(true);
//!
//!     shader_slider::run(options, AppConfig::new().size(1280, 720))
//! }
//! ```
//!
//! ## Embedding
//!
//! [`SlideTransitionWidget`] is generic over [`SlideSurface`], so it can be
//! driven by any host that can upload images and draw a frame. The bundled
//! [`GpuSurface`] renders with wgpu into a winit window; [`run`] wires the two
//! together with keyboard navigation.
//!
//! - **Explicit clock**: the host calls [`SlideTransitionWidget::tick`] with the
//!   elapsed time; loads, the blend tween, and autoplay all advance there.
//! - **Explicit environment**: the surface size and scale factor are reported
//!   by the host, never read from globals.
//! - **Progressive loading**: textures stream in on worker threads and each one
//!   triggers a repaint as it lands.

mod app;
mod config;
mod displacement_pass;
mod easing;
mod error;
mod gpu;
mod gpu_surface;
mod loader;
mod material;
mod plane;
mod surface;
mod texture;
mod widget;

pub use app::{AppConfig, run};
pub use config::{ResolvedOptions, SliderOptions};
pub use easing::{Easing, Tween};
pub use error::{ConfigError, LoadError, SliderError};
pub use gpu::GpuContext;
pub use gpu_surface::GpuSurface;
pub use loader::{ImageSource, LoadedTexture, TextureKey, TextureLoader};
pub use material::{AspectFactors, DisplacementParams, MaterialState, Slot};
pub use surface::{SlideSurface, SurfaceSize};
pub use texture::Texture;
pub use widget::{Direction, SlideTransitionWidget};
