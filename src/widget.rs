//! The slide transition widget: index bookkeeping, the two-slot swap, blend
//! animation, autoplay, and resize handling.
//!
//! The widget is driven cooperatively. The host calls [`tick`] once per frame
//! with the elapsed time in seconds; everything asynchronous (texture loads,
//! the blend tween, the autoplay timer) advances there. Repaints go through
//! the [`SlideSurface`] the widget was mounted on.
//!
//! # Example
//!
//! ```ignore
//! let options = SliderOptions::new()
//!     .images(["one.jpg", "two.jpg", "three.jpg"])
//!     .displacement("disp.png")
//!     .duration(1.0);
//!
//! let Some(mut slider) = SlideTransitionWidget::new(&options, Some(surface)) else {
//!     return; // a warning has already been logged
//! };
//!
//! slider.advance();
//! slider.tick(time);
//! ```
//!
//! [`tick`]: SlideTransitionWidget::tick

use std::time::Duration;

use crate::config::{ResolvedOptions, SliderOptions};
use crate::easing::{Easing, Tween};
use crate::error::SliderError;
use crate::loader::{TextureKey, TextureLoader};
use crate::material::{AspectFactors, MaterialState, Slot};
use crate::surface::{SlideSurface, SurfaceSize};

/// Direction of a slide change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Interval timer that repeatedly runs the forward transition.
#[derive(Debug)]
struct Autoplay {
    period: f32,
    /// Armed on the first tick after construction.
    next_due: Option<f32>,
}

impl Autoplay {
    fn new(period: Duration) -> Self {
        Self {
            period: period.as_secs_f32(),
            next_due: None,
        }
    }

    /// Returns `true` when the timer fired at `time`, re-arming it.
    fn poll(&mut self, time: f32) -> bool {
        let due = *self.next_due.get_or_insert(time + self.period);
        if time < due {
            return false;
        }
        // Interval semantics: fire once, then schedule from the missed slot
        // unless the host stalled for more than a whole period.
        let next = due + self.period;
        self.next_due = Some(if next > time { next } else { time + self.period });
        true
    }
}

/// A displacement crossfade slider mounted on a surface.
pub struct SlideTransitionWidget<S: SlideSurface> {
    surface: S,
    size: SurfaceSize,
    image_ratio: f32,
    texture_count: usize,
    duration: f32,
    easing: Easing,
    loader: TextureLoader,
    /// Index of the slide the last transition moved to.
    index: usize,
    material: MaterialState,
    /// At most one blend animation in flight.
    active: Option<Tween>,
    /// `None` unless autoplay was enabled and not yet cancelled.
    autoplay: Option<Autoplay>,
}

impl<S: SlideSurface> SlideTransitionWidget<S> {
    /// Mount a slider on `container`.
    ///
    /// Returns `None` and logs a single warning when an image, the
    /// displacement map, or the container is missing.
    pub fn new(options: &SliderOptions, container: Option<S>) -> Option<Self> {
        match Self::try_new(options, container) {
            Ok(widget) => Some(widget),
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        }
    }

    /// Like [`new`](Self::new), but hands back the reason instead of logging it.
    pub fn try_new(options: &SliderOptions, container: Option<S>) -> Result<Self, SliderError> {
        let resolved = options.resolve()?;
        let surface = container.ok_or(SliderError::MissingContainer)?;
        Ok(Self::mount(resolved, surface))
    }

    fn mount(options: ResolvedOptions, surface: S) -> Self {
        let size = surface.size();
        let aspect = AspectFactors::cover(
            size.logical_width(),
            size.logical_height(),
            options.image_ratio,
        );
        let loader = TextureLoader::spawn(&options.displacement, &options.images);

        tracing::debug!(
            slides = options.images.len(),
            displacement = %options.displacement,
            width = size.width,
            height = size.height,
            autoplay = ?options.autoplay,
            "mounted slider"
        );

        Self {
            surface,
            size,
            image_ratio: options.image_ratio,
            texture_count: options.images.len(),
            duration: options.duration,
            easing: options.easing,
            loader,
            index: 0,
            material: MaterialState::new(options.params, aspect),
            active: None,
            autoplay: options.autoplay.map(Autoplay::new),
        }
    }

    /// Show the next slide, wrapping to the first. Cancels autoplay for good.
    pub fn advance(&mut self) {
        self.cancel_autoplay();
        self.transition(Direction::Forward);
    }

    /// Show the previous slide, wrapping to the last. Cancels autoplay for good.
    pub fn retreat(&mut self) {
        self.cancel_autoplay();
        self.transition(Direction::Backward);
    }

    /// The host surface changed size: recompute the cover factors and repaint.
    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.material.aspect =
            AspectFactors::cover(size.logical_width(), size.logical_height(), self.image_ratio);
        tracing::debug!(
            width = size.width,
            height = size.height,
            a1 = self.material.aspect.a1,
            a2 = self.material.aspect.a2,
            "resized slider"
        );
        self.surface.resize(size);
        self.repaint();
    }

    /// Advance loads, the blend animation, and autoplay to `time` seconds.
    pub fn tick(&mut self, time: f32) {
        for loaded in self.loader.poll() {
            match loaded.result {
                Ok(image) => {
                    tracing::debug!(key = %loaded.key, "texture loaded");
                    self.surface.upload(loaded.key, &image);
                }
                Err(err) => tracing::warn!(key = %loaded.key, "{err}"),
            }
            // A failed load still repaints, leaving the placeholder visible.
            self.repaint();
        }

        let autoplay_fired = self
            .autoplay
            .as_mut()
            .is_some_and(|autoplay| autoplay.poll(time));
        if autoplay_fired {
            self.transition(Direction::Forward);
        }

        let Some(tween) = self.active.as_mut() else {
            return;
        };
        tween.update(time);
        let complete = tween.is_complete();
        let target = tween.target();
        self.material.blend = tween.value();
        self.repaint();
        if complete {
            // Final exact frame, even if the last step already landed on target.
            self.material.blend = target;
            self.active = None;
            self.repaint();
        }
    }

    /// Draw one frame with the current state.
    pub fn repaint(&mut self) {
        tracing::trace!(
            slot_a = self.material.slot_a,
            slot_b = self.material.slot_b,
            blend = self.material.blend,
            "repaint"
        );
        self.surface.render(&self.material, self.size);
    }

    /// Index of the slide the most recent transition targeted.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn texture_count(&self) -> usize {
        self.texture_count
    }

    pub fn material(&self) -> &MaterialState {
        &self.material
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn autoplay_active(&self) -> bool {
        self.autoplay.is_some()
    }

    /// `true` once every texture load has reported.
    pub fn textures_settled(&self) -> bool {
        self.loader.is_finished()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn cancel_autoplay(&mut self) {
        if self.autoplay.take().is_some() {
            tracing::debug!("autoplay cancelled by manual navigation");
        }
    }

    fn transition(&mut self, direction: Direction) {
        let count = self.texture_count;
        self.index = match direction {
            Direction::Forward => (self.index + 1) % count,
            Direction::Backward => (self.index + count - 1) % count,
        };

        let visible = Slot::visible_at(self.material.blend);
        let incoming = visible.other();
        self.material.bind(incoming, self.index);

        tracing::debug!(
            ?direction,
            index = self.index,
            slot = ?incoming,
            "starting transition"
        );

        // Replacing the tween drops any animation still in flight.
        self.active = Some(Tween::new(
            self.material.blend,
            incoming.blend(),
            self.duration,
            self.easing,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ImageSource;
    use crate::loader::tests::png_bytes;
    use image::RgbaImage;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Instant;

    #[derive(Default)]
    struct RecordingSurface {
        size: Option<SurfaceSize>,
        uploads: Vec<TextureKey>,
        resizes: Vec<SurfaceSize>,
        frames: Vec<MaterialState>,
    }

    impl SlideSurface for RecordingSurface {
        fn size(&self) -> SurfaceSize {
            self.size.unwrap_or(SurfaceSize::new(800, 600, 1.0))
        }

        fn upload(&mut self, key: TextureKey, _image: &RgbaImage) {
            self.uploads.push(key);
        }

        fn resize(&mut self, size: SurfaceSize) {
            self.resizes.push(size);
        }

        fn render(&mut self, material: &MaterialState, _size: SurfaceSize) {
            self.frames.push(*material);
        }
    }

    fn options(count: usize) -> SliderOptions {
        SliderOptions::new()
            .images((0..count).map(|i| ImageSource::memory(png_bytes(2, 2, [i as u8, 0, 0, 255]))))
            .displacement(ImageSource::memory(png_bytes(2, 2, [128, 128, 0, 255])))
            .duration(1.0)
    }

    /// Mount on a recording surface and wait until every load has reported.
    fn mount(options: &SliderOptions) -> SlideTransitionWidget<RecordingSurface> {
        let mut widget = SlideTransitionWidget::new(options, Some(RecordingSurface::default()))
            .expect("valid slider");
        let deadline = Instant::now() + Duration::from_secs(10);
        while !widget.textures_settled() && Instant::now() < deadline {
            widget.tick(0.0);
            thread::sleep(Duration::from_millis(2));
        }
        assert!(widget.textures_settled(), "texture loads did not finish");
        widget
    }

    /// Run ticks until the active tween finishes.
    fn settle(widget: &mut SlideTransitionWidget<RecordingSurface>, time: &mut f32) {
        widget.tick(*time);
        *time += 2.0;
        widget.tick(*time);
        assert!(!widget.is_animating());
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a subscriber capturing WARN events; return the warning lines.
    fn captured_warnings(f: impl FnOnce()) -> Vec<String> {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().expect("buffer lock").clone();
        String::from_utf8(bytes)
            .expect("utf8 log output")
            .lines()
            .filter(|line| line.contains("WARN"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn starts_on_first_slide_with_first_two_bound() {
        let widget = mount(&options(3));
        assert_eq!(widget.index(), 0);
        assert_eq!(widget.material().slot_a, 0);
        assert_eq!(widget.material().slot_b, 1);
        assert_eq!(widget.material().blend, 0.0);
        assert!(!widget.autoplay_active());
    }

    #[test]
    fn two_image_scenario_swaps_slots_and_wraps() {
        let mut widget = mount(&options(2));
        let mut time = 0.0;

        widget.advance();
        assert_eq!(widget.index(), 1);
        assert_eq!(widget.material().slot_b, 1);
        assert_eq!(widget.active.as_ref().map(Tween::target), Some(1.0));
        settle(&mut widget, &mut time);
        assert_eq!(widget.material().blend, 1.0);
        assert_eq!(widget.material().visible_texture(), 1);

        widget.advance();
        assert_eq!(widget.index(), 0);
        assert_eq!(widget.material().slot_a, 0);
        assert_eq!(widget.active.as_ref().map(Tween::target), Some(0.0));
        settle(&mut widget, &mut time);
        assert_eq!(widget.material().blend, 0.0);
        assert_eq!(widget.material().visible_texture(), 0);
    }

    #[test]
    fn advancing_count_times_returns_to_start() {
        for count in 2..=5 {
            let mut widget = mount(&options(count));
            let mut time = 0.0;
            for _ in 0..count {
                widget.advance();
                settle(&mut widget, &mut time);
            }
            assert_eq!(widget.index(), 0, "{count} slides");
            assert_eq!(widget.material().visible_texture(), 0, "{count} slides");
        }
    }

    #[test]
    fn retreat_undoes_advance() {
        let mut widget = mount(&options(4));
        let mut time = 0.0;

        widget.advance();
        settle(&mut widget, &mut time);
        widget.advance();
        settle(&mut widget, &mut time);
        let before = widget.index();

        widget.advance();
        settle(&mut widget, &mut time);
        widget.retreat();
        settle(&mut widget, &mut time);

        assert_eq!(widget.index(), before);
        assert_eq!(widget.material().visible_texture(), before);
    }

    #[test]
    fn retreat_from_first_wraps_to_last() {
        let mut widget = mount(&options(3));
        let mut time = 0.0;
        widget.retreat();
        assert_eq!(widget.index(), 2);
        assert_eq!(widget.material().slot_b, 2);
        settle(&mut widget, &mut time);
        assert_eq!(widget.material().visible_texture(), 2);
    }

    #[test]
    fn blend_rests_exactly_on_zero_or_one() {
        let mut widget = mount(&options(3).easing(Easing::ExpoOut));
        let mut time = 0.0;
        for step in 0..6 {
            if step % 2 == 0 {
                widget.advance();
            } else {
                widget.retreat();
            }
            for _ in 0..30 {
                widget.tick(time);
                time += 0.05;
            }
            widget.tick(time + 1.0);
            let blend = widget.material().blend;
            assert!(blend == 0.0 || blend == 1.0, "blend {blend} after step {step}");
        }
    }

    #[test]
    fn every_tween_step_repaints_plus_one_on_completion() {
        let mut widget = mount(&options(2).easing(Easing::Linear));
        widget.advance();

        let before = widget.surface().frames.len();
        widget.tick(0.0);
        widget.tick(0.5);
        let mid = widget.surface().frames.len();
        assert_eq!(mid - before, 2);
        assert!((widget.material().blend - 0.5).abs() < 1e-6);

        widget.tick(1.0);
        let frames = &widget.surface().frames;
        assert_eq!(frames.len() - mid, 2);
        assert_eq!(frames[frames.len() - 1].blend, 1.0);
    }

    #[test]
    fn new_transition_replaces_tween_in_flight() {
        let mut widget = mount(&options(3).easing(Easing::Linear));
        widget.advance();
        widget.tick(0.0);
        widget.tick(0.3);
        let mid_blend = widget.material().blend;
        assert!(mid_blend > 0.0 && mid_blend < 0.5);

        // Slot A is still the visible one, so slot B is overwritten again.
        widget.advance();
        assert_eq!(widget.index(), 2);
        assert_eq!(widget.material().slot_b, 2);
        let tween = widget.active.as_ref().expect("tween in flight");
        assert_eq!(tween.target(), 1.0);

        widget.tick(0.4);
        assert!(widget.material().blend >= mid_blend);
        widget.tick(2.0);
        assert_eq!(widget.material().blend, 1.0);
        assert_eq!(widget.material().visible_texture(), 2);
    }

    #[test]
    fn zero_duration_snaps_on_next_tick() {
        let options = SliderOptions {
            duration: None,
            ..options(2)
        };
        let mut widget = mount(&options);
        widget.advance();
        widget.tick(0.0);
        assert_eq!(widget.material().blend, 1.0);
        assert!(!widget.is_animating());
    }

    #[test]
    fn resize_recomputes_aspect_and_repaints_once() {
        let mut widget = mount(&options(2));
        assert_eq!(widget.material().aspect, AspectFactors::cover(800.0, 600.0, 1.0));

        let frames = widget.surface().frames.len();
        let size = SurfaceSize::new(1600, 800, 2.0);
        widget.resize(size);
        assert_eq!(widget.material().aspect, AspectFactors { a1: 1.0, a2: 0.5 });
        assert_eq!(widget.surface().resizes, vec![size]);
        assert_eq!(widget.surface().frames.len(), frames + 1);

        widget.resize(size);
        assert_eq!(widget.material().aspect, AspectFactors { a1: 1.0, a2: 0.5 });
    }

    #[test]
    fn textures_load_progressively_with_a_repaint_each() {
        let widget = mount(&options(3));
        let surface = widget.surface();
        assert_eq!(surface.uploads.len(), 4);
        assert!(surface.uploads.contains(&TextureKey::Displacement));
        assert_eq!(surface.frames.len(), 4);
    }

    #[test]
    fn failed_loads_still_repaint() {
        let options = SliderOptions::new()
            .images(["/missing/one.png", "/missing/two.png"])
            .displacement("/missing/disp.png");
        let widget = mount(&options);
        assert!(widget.surface().uploads.is_empty());
        assert_eq!(widget.surface().frames.len(), 3);
    }

    #[test]
    fn autoplay_advances_on_its_period() {
        let mut widget = mount(&options(3).autoplay(true).autoplay_interval_ms(1000));
        assert!(widget.autoplay_active());

        widget.tick(0.0);
        widget.tick(0.9);
        assert_eq!(widget.index(), 0);
        widget.tick(1.0);
        assert_eq!(widget.index(), 1);
        assert!(widget.autoplay_active());
        widget.tick(2.0);
        assert_eq!(widget.index(), 2);
        widget.tick(3.0);
        assert_eq!(widget.index(), 0);
    }

    #[test]
    fn manual_navigation_cancels_autoplay_permanently() {
        let mut widget = mount(&options(3).autoplay(true).autoplay_interval_ms(1000));
        widget.tick(0.0);
        widget.advance();
        assert!(!widget.autoplay_active());
        assert_eq!(widget.index(), 1);

        for step in 1..10 {
            widget.tick(step as f32);
        }
        assert_eq!(widget.index(), 1);
    }

    #[test]
    fn stalled_host_fires_autoplay_once() {
        let mut widget = mount(&options(4).autoplay(true).autoplay_interval_ms(1000));
        widget.tick(0.0);
        widget.tick(10.0);
        assert_eq!(widget.index(), 1);
        widget.tick(10.5);
        assert_eq!(widget.index(), 1);
        widget.tick(11.0);
        assert_eq!(widget.index(), 2);
    }

    #[test]
    fn missing_displacement_warns_once_and_yields_nothing() {
        let warnings = captured_warnings(|| {
            let options = SliderOptions::new().images(["a.png", "b.png"]);
            let widget = SlideTransitionWidget::new(&options, Some(RecordingSurface::default()));
            assert!(widget.is_none());
        });
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains("displacement"));
    }

    #[test]
    fn missing_image_warns_once_and_yields_nothing() {
        let warnings = captured_warnings(|| {
            let options = SliderOptions::new().image("a.png").displacement("d.png");
            let widget = SlideTransitionWidget::new(&options, Some(RecordingSurface::default()));
            assert!(widget.is_none());
        });
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains("images are missing"));
    }

    #[test]
    fn missing_container_warns_once_and_yields_nothing() {
        let warnings = captured_warnings(|| {
            let options = SliderOptions::new()
                .images(["a.png", "b.png"])
                .displacement("d.png");
            let widget = SlideTransitionWidget::<RecordingSurface>::new(&options, None);
            assert!(widget.is_none());
        });
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains("container"));
    }

    #[test]
    fn try_new_reports_the_reason() {
        let options = SliderOptions::new().images(["a.png", "b.png"]);
        let err = SlideTransitionWidget::try_new(&options, Some(RecordingSurface::default()))
            .err()
            .expect("missing displacement");
        assert!(matches!(err, SliderError::MissingDisplacement));
    }
}
