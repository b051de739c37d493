//! Easing curves and the blend-factor tween that drives slide transitions.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Easing functions for smooth transitions.
///
/// These control the acceleration curve of the blend animation. The default
/// is [`Easing::ExpoOut`]: a fast start that settles gently on the new slide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant speed throughout.
    Linear,
    /// Start slow, accelerate.
    EaseIn,
    /// Start fast, decelerate.
    EaseOut,
    /// Start slow, speed up, then slow down.
    EaseInOut,
    /// Exponential acceleration.
    ExpoIn,
    /// Exponential deceleration.
    #[default]
    ExpoOut,
    /// Exponential on both ends.
    ExpoInOut,
}

impl Easing {
    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    ///
    /// The endpoints are exact: `apply(0.0) == 0.0` and `apply(1.0) == 1.0`.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::ExpoIn => {
                if t <= 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * t - 10.0)
                }
            }
            Easing::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Easing::ExpoInOut => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
            Easing::ExpoIn => "expo-in",
            Easing::ExpoOut => "expo-out",
            Easing::ExpoInOut => "expo-in-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Easing::Linear),
            "ease-in" => Ok(Easing::EaseIn),
            "ease-out" => Ok(Easing::EaseOut),
            "ease-in-out" => Ok(Easing::EaseInOut),
            "expo-in" => Ok(Easing::ExpoIn),
            "expo-out" => Ok(Easing::ExpoOut),
            "expo-in-out" => Ok(Easing::ExpoInOut),
            other => Err(format!(
                "unknown easing '{other}' (expected linear, ease-in, ease-out, ease-in-out, expo-in, expo-out, or expo-in-out)"
            )),
        }
    }
}

/// A single in-flight animation of the blend factor.
///
/// The tween is anchored lazily: the first call to [`update`](Self::update)
/// records the start time, so a tween can be created between frames without
/// knowing the clock.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    /// Duration in seconds. Zero completes on the first update.
    duration: f32,
    easing: Easing,
    start_time: Option<f32>,
    /// Linear progress (0.0 to 1.0).
    progress: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            easing,
            start_time: None,
            progress: 0.0,
        }
    }

    /// Update the tween based on current time.
    ///
    /// Returns `true` if the tween is complete.
    pub fn update(&mut self, current_time: f32) -> bool {
        let start = *self.start_time.get_or_insert(current_time);
        let elapsed = current_time - start;

        self.progress = if self.duration > 0.0 {
            (elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.progress >= 1.0
    }

    /// Current eased value. Exactly the target once complete.
    pub fn value(&self) -> f32 {
        if self.progress >= 1.0 {
            self.to
        } else {
            self.from + (self.to - self.from) * self.easing.apply(self.progress)
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}
