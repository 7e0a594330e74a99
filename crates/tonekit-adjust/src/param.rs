//! Parameter kinds and slider configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AdjustError;

/// The closed set of hue/saturation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Hue rotation in degrees.
    Hue,
    /// Global saturation.
    Saturation,
    /// Saturation boost weighted toward muted pixels.
    Vibrance,
    /// Uniform brightness scale.
    Luminosity,
    /// Linear contrast around mid grey.
    Contrast,
}

impl ParamKind {
    /// Every kind, in storage order.
    pub const ALL: [ParamKind; 5] = [
        Self::Hue,
        Self::Saturation,
        Self::Vibrance,
        Self::Luminosity,
        Self::Contrast,
    ];

    /// Display name shown next to the slider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hue => "Hue",
            Self::Saturation => "Saturation",
            Self::Vibrance => "Vibrance",
            Self::Luminosity => "Luminosity",
            Self::Contrast => "Contrast",
        }
    }

    /// Fixed storage slot, independent of registration order.
    pub fn index(&self) -> usize {
        match self {
            Self::Hue => 0,
            Self::Saturation => 1,
            Self::Vibrance => 2,
            Self::Luminosity => 3,
            Self::Contrast => 4,
        }
    }

    /// Slider configuration the operator starts with.
    pub fn default_config(&self) -> SliderConfig {
        match self {
            Self::Hue => SliderConfig::linear(-180.0, 180.0),
            Self::Saturation | Self::Vibrance | Self::Luminosity => SliderConfig::linear(-100.0, 100.0),
            Self::Contrast => SliderConfig::linear(-127.0, 127.0),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKind {
    type Err = AdjustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AdjustError::UnknownParameterName(s.to_string()))
    }
}

/// Range, default and presentation of one slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderConfig {
    /// Smallest accepted value
    pub min: f32,
    /// Largest accepted value
    pub max: f32,
    /// Value on construction and reset
    pub default: f32,
    /// Slider increment
    pub step: f32,
    /// Whether the slider moves on a log scale
    pub logarithmic: bool,
    /// Number format for display, e.g. `"0"` or `"0.0"`
    pub display_format: String,
}

impl SliderConfig {
    /// Linear whole-unit slider over `[min, max]` with default 0.
    pub fn linear(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            default: 0.0,
            step: 1.0,
            logarithmic: false,
            display_format: "0".to_string(),
        }
    }

    /// Rounds to the nearest whole unit, then clamps into the whole units
    /// of the range.
    ///
    /// Halves round away from zero. Fractional bounds are pulled inward, so
    /// the result is always a whole number. Idempotent.
    pub fn round(&self, value: f32) -> f32 {
        value.round().clamp(self.min.ceil(), self.max.floor())
    }

    /// Returns true if `value` is already rounded and in range.
    pub fn accepts(&self, value: f32) -> bool {
        value == value.round() && (self.min..=self.max).contains(&value)
    }
}
