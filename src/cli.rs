use std::path::PathBuf;

use clap::Parser;
use shader_slider::{AppConfig, Easing, SliderOptions};

#[derive(Parser, Debug)]
#[command(
    name = "shader-slider",
    author,
    version,
    about = "Displacement-map image slider"
)]
pub struct Cli {
    /// Slide images: file paths or http(s) URLs.
    #[arg(value_name = "IMAGES")]
    pub images: Vec<String>,

    /// Displacement map image (path or URL).
    #[arg(long, short = 'd', value_name = "IMAGE")]
    pub displacement: Option<String>,

    /// TOML file with slider options; command-line values take precedence.
    #[arg(long, short = 'c', value_name = "PATH", env = "SHADER_SLIDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Height/width ratio of the slide images.
    #[arg(long, value_name = "RATIO")]
    pub ratio: Option<f32>,

    /// Displacement intensity shared by both slots.
    #[arg(long)]
    pub intensity: Option<f32>,

    /// Displacement intensity for the first slot.
    #[arg(long)]
    pub intensity1: Option<f32>,

    /// Displacement intensity for the second slot.
    #[arg(long)]
    pub intensity2: Option<f32>,

    /// Displacement angle in radians shared by both slots.
    #[arg(long, allow_hyphen_values = true)]
    pub angle: Option<f32>,

    /// Displacement angle in radians for the first slot.
    #[arg(long, allow_hyphen_values = true)]
    pub angle1: Option<f32>,

    /// Displacement angle in radians for the second slot.
    #[arg(long, allow_hyphen_values = true)]
    pub angle2: Option<f32>,

    /// Transition duration in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Easing curve: `linear`, `ease-in`, `ease-out`, `ease-in-out`, `expo-in`,
    /// `expo-out` (default), or `expo-in-out`.
    #[arg(long, value_name = "CURVE", value_parser = parse_easing)]
    pub easing: Option<Easing>,

    /// Advance automatically until a key is pressed.
    #[arg(long, overrides_with = "no_autoplay")]
    pub autoplay: bool,

    /// Turn autoplay off even when the config file enables it.
    #[arg(long, overrides_with = "autoplay")]
    pub no_autoplay: bool,

    /// Autoplay interval in milliseconds.
    #[arg(long, value_name = "MS")]
    pub autoplay_ms: Option<u64>,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Window title.
    #[arg(long, default_value = "Shader Slider")]
    pub title: String,
}

impl Cli {
    /// Options given on the command line, to be merged over any config file.
    pub fn slider_options(&self) -> SliderOptions {
        SliderOptions {
            images: self.images.iter().map(|image| image.as_str().into()).collect(),
            displacement: self.displacement.as_deref().map(Into::into),
            image_ratio: self.ratio,
            intensity: self.intensity,
            intensity1: self.intensity1,
            intensity2: self.intensity2,
            angle: self.angle,
            angle1: self.angle1,
            angle2: self.angle2,
            duration: self.duration,
            easing: self.easing,
            autoplay: match (self.autoplay, self.no_autoplay) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            autoplay_interval_ms: self.autoplay_ms,
        }
    }

    pub fn app_config(&self) -> AppConfig {
        AppConfig::new()
            .title(&self.title)
            .size(self.width, self.height)
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_easing(value: &str) -> Result<Easing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("easing must not be empty".to_string());
    }
    trimmed.parse()
}
