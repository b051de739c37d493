//! The host seam between the widget and whatever actually draws pixels.

use image::RgbaImage;

use crate::loader::TextureKey;
use crate::material::MaterialState;

/// Size of a rendering surface as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub scale_factor: f32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32, scale_factor: f32) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Width in logical pixels.
    pub fn logical_width(&self) -> f32 {
        self.width as f32 / self.scale_factor.max(f32::EPSILON)
    }

    /// Height in logical pixels.
    pub fn logical_height(&self) -> f32 {
        self.height as f32 / self.scale_factor.max(f32::EPSILON)
    }
}

/// A surface the slider can mount on and paint to.
///
/// The widget never reaches for ambient window state: the host reports the
/// size once through [`size`](Self::size) and afterwards through
/// `SlideTransitionWidget::resize`.
pub trait SlideSurface {
    /// Current size of the surface.
    fn size(&self) -> SurfaceSize;

    /// Store a decoded image for later binding.
    fn upload(&mut self, key: TextureKey, image: &RgbaImage);

    /// Adapt the backing store to a new size.
    fn resize(&mut self, size: SurfaceSize);

    /// Draw one frame from the given state.
    fn render(&mut self, material: &MaterialState, size: SurfaceSize);
}
