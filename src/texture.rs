use image::RgbaImage;

use crate::gpu::GpuContext;

/// A GPU texture that can be bound to the displacement shader.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    ///
    /// Slide images are color data and use an sRGB format; the displacement
    /// map holds offsets and must be sampled linearly (`srgb = false`).
    pub fn from_rgba(
        gpu: &GpuContext,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
        srgb: bool,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let format = if srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Upload a decoded image.
    pub fn from_image(gpu: &GpuContext, image: &RgbaImage, label: &str, srgb: bool) -> Self {
        let (width, height) = image.dimensions();
        Self::from_rgba(gpu, image.as_raw(), width, height, label, srgb)
    }

    /// A 1×1 fully transparent texture bound until the real image arrives.
    pub fn placeholder(gpu: &GpuContext) -> Self {
        Self::from_rgba(gpu, &[0, 0, 0, 0], 1, 1, "Placeholder Texture", true)
    }
}

/// Size to downscale a `width`×`height` image to so that neither side exceeds
/// `max_side`, keeping the aspect ratio. `None` when the image already fits.
pub(crate) fn fit_within(width: u32, height: u32, max_side: u32) -> Option<(u32, u32)> {
    if width <= max_side && height <= max_side {
        return None;
    }
    let scale = f64::from(max_side) / f64::from(width.max(height));
    let fit = |side: u32| ((f64::from(side) * scale).floor() as u32).clamp(1, max_side);
    Some((fit(width), fit(height)))
}

/// The sampler shared by every slider texture: linear filtering, clamped edges.
pub(crate) fn linear_sampler(gpu: &GpuContext) -> wgpu::Sampler {
    gpu.device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Slider Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_within_the_limit_are_untouched() {
        assert_eq!(fit_within(8192, 8192, 8192), None);
        assert_eq!(fit_within(1920, 1080, 8192), None);
    }

    #[test]
    fn wide_panorama_is_scaled_to_the_limit() {
        assert_eq!(fit_within(9000, 3000, 8192), Some((8192, 2730)));
    }

    #[test]
    fn tall_image_is_scaled_on_its_long_side() {
        assert_eq!(fit_within(3000, 9000, 8192), Some((2730, 8192)));
    }

    #[test]
    fn thin_strip_keeps_at_least_one_pixel() {
        assert_eq!(fit_within(100_000, 1, 8192), Some((8192, 1)));
    }
}
