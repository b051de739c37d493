//! Windowed host for the slider: a winit event loop driving one
//! [`SlideTransitionWidget`] over a [`GpuSurface`].
//!
//! Right arrow and Space advance, Left retreats, Escape closes the window.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{WindowAttributes, WindowId};

use crate::config::SliderOptions;
use crate::error::SliderError;
use crate::gpu_surface::GpuSurface;
use crate::surface::SurfaceSize;
use crate::widget::SlideTransitionWidget;

/// Frame interval while something is moving.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Configuration for the app window.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Shader Slider".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Open a window and run the slider until it is closed.
///
/// Options are validated before any window is created, so a missing image or
/// displacement map fails fast.
///
/// # Example
/// ```no_run
/// use shader_slider::{AppConfig, SliderOptions};
///
/// let options = SliderOptions::new()
///     .images(["one.jpg", "two.jpg"])
///     .displacement("disp.png")
///     .duration(1.2);
///
/// shader_slider::run(options, AppConfig::new().title("Gallery").size(1280, 720))?;
/// # Ok::<(), shader_slider::SliderError>(())
/// ```
pub fn run(options: SliderOptions, config: AppConfig) -> Result<(), SliderError> {
    options.resolve()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = SliderApp::Pending { options, config };
    event_loop.run_app(&mut app)?;

    match app {
        SliderApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

enum SliderApp {
    Pending {
        options: SliderOptions,
        config: AppConfig,
    },
    Running {
        slider: SlideTransitionWidget<GpuSurface>,
        start_time: Instant,
    },
    Failed(SliderError),
}

impl SliderApp {
    fn start(
        event_loop: &ActiveEventLoop,
        options: &SliderOptions,
        config: &AppConfig,
    ) -> Result<Self, SliderError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .with_transparent(true);

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let surface = GpuSurface::new(window.clone())?;
        let slider = SlideTransitionWidget::try_new(options, Some(surface))?;
        window.request_redraw();

        Ok(SliderApp::Running {
            slider,
            start_time: Instant::now(),
        })
    }
}

impl ApplicationHandler for SliderApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let SliderApp::Pending { options, config } = self else {
            return;
        };

        *self = match Self::start(event_loop, options, config) {
            Ok(running) => running,
            Err(err) => {
                event_loop.exit();
                SliderApp::Failed(err)
            }
        };
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let SliderApp::Running { slider, .. } = self else {
            return;
        };
        let window = slider.surface().window().clone();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let scale_factor = window.scale_factor() as f32;
                slider.resize(SurfaceSize::new(size.width, size.height, scale_factor));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = window.inner_size();
                slider.resize(SurfaceSize::new(
                    size.width,
                    size.height,
                    scale_factor as f32,
                ));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::ArrowRight | KeyCode::Space => slider.advance(),
                KeyCode::ArrowLeft => slider.retreat(),
                KeyCode::Escape => event_loop.exit(),
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                slider.repaint();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let SliderApp::Running {
            slider, start_time, ..
        } = self
        else {
            return;
        };

        slider.tick(start_time.elapsed().as_secs_f32());

        // Keep ticking only while there is something to advance.
        let busy = slider.is_animating() || slider.autoplay_active() || !slider.textures_settled();
        event_loop.set_control_flow(if busy {
            ControlFlow::WaitUntil(Instant::now() + FRAME_INTERVAL)
        } else {
            ControlFlow::Wait
        });
    }
}
