//! Slider options: builder, TOML loading, and resolution of defaults.

use std::f32::consts::FRAC_PI_4;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::easing::Easing;
use crate::error::{ConfigError, SliderError};
use crate::loader::ImageSource;
use crate::material::DisplacementParams;

const DEFAULT_IMAGE_RATIO: f32 = 1.0;
const DEFAULT_INTENSITY1: f32 = 1.0;
const DEFAULT_INTENSITY2: f32 = 0.0;
const DEFAULT_ANGLE: f32 = FRAC_PI_4;
const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 5000;

/// Caller-supplied slider options.
///
/// Every numeric option is optional; [`resolve`](Self::resolve) applies the
/// fallbacks. Per-slot values win over the shared `intensity`/`angle`.
///
/// # Example
///
/// ```
/// use shader_slider::{Easing, SliderOptions};
///
/// let options = SliderOptions::new()
///     .image("slides/one.jpg")
///     .image("slides/two.jpg")
///     .displacement("maps/swirl.png")
///     .duration(1.2)
///     .easing(Easing::ExpoInOut);
/// assert!(options.resolve().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SliderOptions {
    pub images: Vec<ImageSource>,
    pub displacement: Option<ImageSource>,
    /// Height/width ratio of the slide images.
    pub image_ratio: Option<f32>,
    pub intensity: Option<f32>,
    pub intensity1: Option<f32>,
    pub intensity2: Option<f32>,
    /// Shared displacement angle in radians.
    pub angle: Option<f32>,
    pub angle1: Option<f32>,
    pub angle2: Option<f32>,
    /// Transition duration in seconds.
    pub duration: Option<f32>,
    pub easing: Option<Easing>,
    /// `None` leaves autoplay off unless a merged layer turns it on.
    pub autoplay: Option<bool>,
    pub autoplay_interval_ms: Option<u64>,
}

/// Options after validation, with every fallback applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedOptions {
    pub images: Vec<ImageSource>,
    pub displacement: ImageSource,
    pub image_ratio: f32,
    pub params: DisplacementParams,
    pub duration: f32,
    pub easing: Easing,
    /// `Some` when autoplay is enabled.
    pub autoplay: Option<Duration>,
}

impl SliderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn image(mut self, source: impl Into<ImageSource>) -> Self {
        self.images.push(source.into());
        self
    }

    pub fn images<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ImageSource>,
    {
        self.images.extend(sources.into_iter().map(Into::into));
        self
    }

    pub fn displacement(mut self, source: impl Into<ImageSource>) -> Self {
        self.displacement = Some(source.into());
        self
    }

    pub fn image_ratio(mut self, ratio: f32) -> Self {
        self.image_ratio = Some(ratio);
        self
    }

    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn intensities(mut self, intensity1: f32, intensity2: f32) -> Self {
        self.intensity1 = Some(intensity1);
        self.intensity2 = Some(intensity2);
        self
    }

    pub fn angle(mut self, radians: f32) -> Self {
        self.angle = Some(radians);
        self
    }

    pub fn angles(mut self, angle1: f32, angle2: f32) -> Self {
        self.angle1 = Some(angle1);
        self.angle2 = Some(angle2);
        self
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn autoplay(mut self, enabled: bool) -> Self {
        self.autoplay = Some(enabled);
        self
    }

    pub fn autoplay_interval_ms(mut self, interval: u64) -> Self {
        self.autoplay_interval_ms = Some(interval);
        self
    }

    /// Overlay every option set in `other` on top of `self`.
    ///
    /// Images are replaced wholesale when `other` lists any.
    pub fn merge(mut self, other: SliderOptions) -> Self {
        if !other.images.is_empty() {
            self.images = other.images;
        }
        self.displacement = other.displacement.or(self.displacement);
        self.image_ratio = other.image_ratio.or(self.image_ratio);
        self.intensity = other.intensity.or(self.intensity);
        self.intensity1 = other.intensity1.or(self.intensity1);
        self.intensity2 = other.intensity2.or(self.intensity2);
        self.angle = other.angle.or(self.angle);
        self.angle1 = other.angle1.or(self.angle1);
        self.angle2 = other.angle2.or(self.angle2);
        self.duration = other.duration.or(self.duration);
        self.easing = other.easing.or(self.easing);
        self.autoplay = other.autoplay.or(self.autoplay);
        self.autoplay_interval_ms = other.autoplay_interval_ms.or(self.autoplay_interval_ms);
        self
    }

    /// Validate the required sources and apply every fallback.
    pub fn resolve(&self) -> Result<ResolvedOptions, SliderError> {
        if self.images.len() < 2 || self.images.iter().any(ImageSource::is_empty) {
            return Err(SliderError::MissingImages);
        }
        let displacement = match &self.displacement {
            Some(source) if !source.is_empty() => source.clone(),
            _ => return Err(SliderError::MissingDisplacement),
        };

        let angle = self.angle.unwrap_or(DEFAULT_ANGLE);
        let params = DisplacementParams {
            intensity1: self
                .intensity1
                .or(self.intensity)
                .unwrap_or(DEFAULT_INTENSITY1),
            intensity2: self
                .intensity2
                .or(self.intensity)
                .unwrap_or(DEFAULT_INTENSITY2),
            angle1: self.angle1.unwrap_or(angle),
            angle2: self.angle2.unwrap_or(-angle * 3.0),
        };

        let autoplay = self.autoplay.unwrap_or(false).then(|| {
            Duration::from_millis(
                self.autoplay_interval_ms
                    .filter(|&ms| ms > 0)
                    .unwrap_or(DEFAULT_AUTOPLAY_INTERVAL_MS),
            )
        });

        Ok(ResolvedOptions {
            images: self.images.clone(),
            displacement,
            image_ratio: self.image_ratio.unwrap_or(DEFAULT_IMAGE_RATIO),
            params,
            duration: self.duration.unwrap_or(0.0).max(0.0),
            easing: self.easing.unwrap_or_default(),
            autoplay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_images() -> SliderOptions {
        SliderOptions::new()
            .images(["a.jpg", "b.jpg"])
            .displacement("disp.png")
    }

    #[test]
    fn defaults_follow_observed_fallbacks() {
        let resolved = two_images().resolve().expect("valid options");
        assert_eq!(resolved.image_ratio, 1.0);
        assert_eq!(resolved.params.intensity1, 1.0);
        assert_eq!(resolved.params.intensity2, 0.0);
        assert_eq!(resolved.params.angle1, FRAC_PI_4);
        assert_eq!(resolved.params.angle2, -3.0 * FRAC_PI_4);
        assert_eq!(resolved.duration, 0.0);
        assert_eq!(resolved.easing, Easing::ExpoOut);
        assert_eq!(resolved.autoplay, None);
    }

    #[test]
    fn shared_values_feed_both_slots() {
        let resolved = two_images()
            .intensity(0.3)
            .angle(1.0)
            .resolve()
            .expect("valid options");
        assert_eq!(resolved.params.intensity1, 0.3);
        assert_eq!(resolved.params.intensity2, 0.3);
        assert_eq!(resolved.params.angle1, 1.0);
        assert_eq!(resolved.params.angle2, -3.0);
    }

    #[test]
    fn per_slot_values_override_shared_ones() {
        let resolved = two_images()
            .intensity(0.3)
            .intensities(0.1, 0.9)
            .angle(1.0)
            .angles(0.2, 0.4)
            .resolve()
            .expect("valid options");
        assert_eq!(resolved.params.intensity1, 0.1);
        assert_eq!(resolved.params.intensity2, 0.9);
        assert_eq!(resolved.params.angle1, 0.2);
        assert_eq!(resolved.params.angle2, 0.4);
    }

    #[test]
    fn autoplay_interval_defaults_to_five_seconds() {
        let resolved = two_images().autoplay(true).resolve().expect("valid options");
        assert_eq!(resolved.autoplay, Some(Duration::from_millis(5000)));

        let resolved = two_images()
            .autoplay(true)
            .autoplay_interval_ms(750)
            .resolve()
            .expect("valid options");
        assert_eq!(resolved.autoplay, Some(Duration::from_millis(750)));
    }

    #[test]
    fn rejects_single_image() {
        let err = SliderOptions::new()
            .image("a.jpg")
            .displacement("disp.png")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, SliderError::MissingImages));
    }

    #[test]
    fn rejects_empty_image_entry() {
        let err = SliderOptions::new()
            .images(["a.jpg", ""])
            .displacement("disp.png")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, SliderError::MissingImages));
    }

    #[test]
    fn rejects_missing_displacement() {
        let err = SliderOptions::new()
            .images(["a.jpg", "b.jpg"])
            .resolve()
            .unwrap_err();
        assert!(matches!(err, SliderError::MissingDisplacement));
    }

    #[test]
    fn merge_lets_an_explicit_false_disable_autoplay() {
        let base = two_images().autoplay(true);
        assert_eq!(base.clone().merge(SliderOptions::new()).autoplay, Some(true));

        let merged = base.merge(SliderOptions::new().autoplay(false));
        assert_eq!(merged.resolve().expect("valid options").autoplay, None);
    }

    #[test]
    fn parses_toml() {
        let options = SliderOptions::from_toml_str(
            r#"
images = ["one.jpg", "https://example.com/two.jpg"]
displacement = "maps/disp.png"
image_ratio = 0.75
intensity = 0.4
duration = 1.5
easing = "ease-in-out"
autoplay = true
autoplay_interval_ms = 3000
"#,
        )
        .expect("parse options");

        assert_eq!(options.images.len(), 2);
        assert_eq!(
            options.images[1],
            ImageSource::Url("https://example.com/two.jpg".to_string())
        );
        let resolved = options.resolve().expect("valid options");
        assert_eq!(resolved.image_ratio, 0.75);
        assert_eq!(resolved.duration, 1.5);
        assert_eq!(resolved.easing, Easing::EaseInOut);
        assert_eq!(resolved.autoplay, Some(Duration::from_millis(3000)));
    }

    #[test]
    fn rejects_unknown_toml_keys() {
        let err = SliderOptions::from_toml_str("speed = 2.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reads_toml_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("slider.toml");
        fs::write(&path, "images = [\"a.png\", \"b.png\"]\ndisplacement = \"d.png\"\n")
            .expect("write config");

        let options = SliderOptions::from_toml_file(&path).expect("load config");
        assert!(options.resolve().is_ok());

        let err = SliderOptions::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn merge_prefers_overlay_values() {
        let base = two_images().duration(2.0).intensity(0.5);
        let merged = base.merge(SliderOptions::new().duration(0.5).image("c.jpg"));
        assert_eq!(merged.duration, Some(0.5));
        assert_eq!(merged.intensity, Some(0.5));
        assert_eq!(merged.images, vec![ImageSource::from("c.jpg")]);
        assert_eq!(merged.displacement, Some(ImageSource::from("disp.png")));
    }
}
