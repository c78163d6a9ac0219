//! Widget configuration and update patches

use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::geometry::{SIZE_LARGE, SIZE_MEDIUM, SIZE_SMALL};

/// Face size: a named preset or a literal pixel dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSpec {
    Small,
    Medium,
    Large,
    Pixels(f64),
}

impl SizeSpec {
    /// Resolve the size to a pixel dimension
    pub fn resolve(&self) -> f64 {
        match self {
            SizeSpec::Small => SIZE_SMALL,
            SizeSpec::Medium => SIZE_MEDIUM,
            SizeSpec::Large => SIZE_LARGE,
            SizeSpec::Pixels(px) => *px,
        }
    }
}

impl Serialize for SizeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SizeSpec::Small => serializer.serialize_str("small"),
            SizeSpec::Medium => serializer.serialize_str("medium"),
            SizeSpec::Large => serializer.serialize_str("large"),
            SizeSpec::Pixels(px) => serializer.serialize_f64(*px),
        }
    }
}

impl<'de> Deserialize<'de> for SizeSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Pixels(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Name(name) => match name.as_str() {
                "small" => Ok(SizeSpec::Small),
                "medium" => Ok(SizeSpec::Medium),
                "large" => Ok(SizeSpec::Large),
                other => Err(de::Error::unknown_variant(
                    other,
                    &["small", "medium", "large"],
                )),
            },
            Raw::Pixels(px) => Ok(SizeSpec::Pixels(px)),
        }
    }
}

/// Widget options, merged over defaults at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClockOptions {
    /// Run the simulated time backwards
    pub countdown: bool,
    /// Allow repositioning the widget by dragging
    pub draggable: bool,
    /// Flip the face horizontally
    pub h_mirrored: bool,
    /// Flip the face vertically
    pub v_mirrored: bool,
    /// Oscillate the simulated time forward and back each tick
    pub low_battery: bool,
    /// Accepted but not implemented (no audio backend)
    pub sound_on: bool,
    /// Face size
    pub size: SizeSpec,
    /// Ticks per second multiplier
    pub speed: f64,
    /// Start the simulated time from this date instead of now
    pub date: Option<NaiveDateTime>,
}

impl ClockOptions {
    /// Replace out-of-range values with their defaults
    pub fn sanitize(&mut self) {
        self.speed = sanitized_speed(self.speed);
    }

    /// The scheduler period implied by the current speed
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.speed)
    }
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self {
            countdown: false,
            draggable: false,
            h_mirrored: false,
            v_mirrored: false,
            low_battery: false,
            sound_on: false,
            size: SizeSpec::Medium,
            speed: 1.0,
            date: None,
        }
    }
}

/// Clamp a speed multiplier to the valid range.
///
/// A non-finite or non-positive speed would yield an infinite or NaN
/// scheduler period, so it falls back to the default of 1.
pub fn sanitized_speed(speed: f64) -> f64 {
    if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        warn!("Invalid speed {}, falling back to 1", speed);
        1.0
    }
}

/// A partial update applied through `ClockWidget::update`.
///
/// Unrecognized keys land in `extra` and are stored verbatim in the
/// widget configuration for later reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClockPatch {
    pub countdown: Option<bool>,
    pub draggable: Option<bool>,
    pub h_mirrored: Option<bool>,
    pub v_mirrored: Option<bool>,
    pub low_battery: Option<bool>,
    pub sound_on: Option<bool>,
    pub size: Option<SizeSpec>,
    pub speed: Option<f64>,
    pub date: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
