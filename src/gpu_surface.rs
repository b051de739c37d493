//! The wgpu implementation of [`SlideSurface`].

use std::sync::Arc;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use winit::window::Window;

use crate::displacement_pass::{DisplacementPass, DisplacementUniforms, SlotViews};
use crate::error::SliderError;
use crate::gpu::GpuContext;
use crate::loader::TextureKey;
use crate::material::MaterialState;
use crate::plane::PlaneMesh;
use crate::surface::{SlideSurface, SurfaceSize};
use crate::texture::{Texture, fit_within};

/// A window-backed surface that draws the slider plane with wgpu.
///
/// Textures that have not arrived yet are bound as a 1×1 transparent
/// placeholder, so frames rendered during loading show nothing for them.
pub struct GpuSurface {
    window: Arc<Window>,
    gpu: GpuContext,
    pass: DisplacementPass,
    plane: PlaneMesh,
    placeholder: Texture,
    displacement: Option<Texture>,
    slides: Vec<Option<Texture>>,
    size: SurfaceSize,
}

impl GpuSurface {
    pub fn new(window: Arc<Window>) -> Result<Self, SliderError> {
        let physical = window.inner_size();
        let size = SurfaceSize::new(
            physical.width,
            physical.height,
            window.scale_factor() as f32,
        );

        let gpu = GpuContext::new(window.clone())?;
        let pass = DisplacementPass::new(&gpu);
        let plane = PlaneMesh::new(&gpu, size.logical_width(), size.logical_height());
        let placeholder = Texture::placeholder(&gpu);

        Ok(Self {
            window,
            gpu,
            pass,
            plane,
            placeholder,
            displacement: None,
            slides: Vec::new(),
            size,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    fn slide_view(&self, index: usize) -> &wgpu::TextureView {
        self.slides
            .get(index)
            .and_then(Option::as_ref)
            .map_or(&self.placeholder.view, |texture| &texture.view)
    }
}

impl SlideSurface for GpuSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn upload(&mut self, key: TextureKey, image: &RgbaImage) {
        let label = key.to_string();
        let max_side = self.gpu.device.limits().max_texture_dimension_2d;
        let (width, height) = image.dimensions();

        let scaled;
        let image = match fit_within(width, height, max_side) {
            Some((fit_width, fit_height)) => {
                tracing::warn!(
                    texture = %label,
                    "{width}x{height} exceeds the {max_side}px texture limit, downscaling to {fit_width}x{fit_height}"
                );
                scaled = imageops::resize(image, fit_width, fit_height, FilterType::Triangle);
                &scaled
            }
            None => image,
        };

        let texture = Texture::from_image(&self.gpu, image, &label, key != TextureKey::Displacement);
        tracing::debug!(texture = %label, "uploaded {}x{}", texture.width, texture.height);

        match key {
            TextureKey::Displacement => self.displacement = Some(texture),
            TextureKey::Slide(index) => {
                if self.slides.len() <= index {
                    self.slides.resize_with(index + 1, || None);
                }
                self.slides[index] = Some(texture);
            }
        }
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.gpu.resize(size.width, size.height);
        self.plane
            .resize(&self.gpu, size.logical_width(), size.logical_height());
    }

    fn render(&mut self, material: &MaterialState, size: SurfaceSize) {
        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost, reconfiguring");
                self.gpu.reconfigure();
                return;
            }
            Err(err) => {
                tracing::warn!("failed to acquire frame: {err}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Slider Encoder"),
            });

        let views = SlotViews {
            displacement: self
                .displacement
                .as_ref()
                .map_or(&self.placeholder.view, |texture| &texture.view),
            slot_a: self.slide_view(material.slot_a),
            slot_b: self.slide_view(material.slot_b),
        };
        let uniforms = DisplacementUniforms::new(material, size);
        self.pass
            .render(&self.gpu, &mut encoder, &view, &self.plane, views, &uniforms);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        frame.present();
    }
}
