use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inches per 10 cm.
pub const INCHES_PER_10_CM: f64 = 3.937;

/// Floor for per-inch divisors so a zero gauge never divides by zero.
const MIN_PER_INCH: f64 = 1e-6;

/// Average stitch height used to estimate crown increase rounds, in inches.
const CROWN_STITCH_HEIGHT_IN: f64 = 0.33;

/// Stitches and rows per inch measured from a test swatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub sts_per_in: f64,
    pub rows_per_in: f64,
}

impl Default for Gauge {
    fn default() -> Self {
        Self {
            sts_per_in: 4.5,
            rows_per_in: 3.5,
        }
    }
}

impl Gauge {
    pub fn new(sts_per_in: f64, rows_per_in: f64) -> Self {
        Self {
            sts_per_in,
            rows_per_in,
        }
    }

    /// Convert a swatch counted over 10 cm.
    pub fn from_metric(sts_per_10cm: f64, rows_per_10cm: f64) -> Self {
        Self::new(
            sts_per_10cm / INCHES_PER_10_CM,
            rows_per_10cm / INCHES_PER_10_CM,
        )
    }
}

/// Stitches to cast on around a circumference, rounded to a pattern multiple.
pub fn cast_on_for_circumference(
    circumference_in: f64,
    sts_per_in: f64,
    ease: f64,
    multiple: u32,
) -> u32 {
    let multiple = f64::from(multiple.max(1));
    let base = circumference_in * sts_per_in.max(MIN_PER_INCH) * ease;
    ((base / multiple).round_ties_even() * multiple).max(0.0) as u32
}

/// Halves round to the even neighbour, so 7.5 in at 3 rows/in is 22 rows.
pub fn rows_for_height(height_in: f64, rows_per_in: f64) -> u32 {
    (height_in * rows_per_in.max(MIN_PER_INCH))
        .round_ties_even()
        .max(0.0) as u32
}

pub fn beanie_height_from_circumference(circumference_in: f64) -> f64 {
    0.36 * circumference_in
}

pub fn crown_increase_rounds(target_circumference_in: f64) -> u32 {
    let radius_in = target_circumference_in / (2.0 * std::f64::consts::PI);
    ((radius_in / CROWN_STITCH_HEIGHT_IN).round_ties_even() as u32).max(1)
}

/// Stitch used for a worked rectangle; taller stitches cover area faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StitchType {
    Sc,
    Hdc,
    #[default]
    Dc,
    Tr,
    Granny,
}

impl StitchType {
    pub const ALL: [StitchType; 5] = [
        StitchType::Sc,
        StitchType::Hdc,
        StitchType::Dc,
        StitchType::Tr,
        StitchType::Granny,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StitchType::Sc => "sc",
            StitchType::Hdc => "hdc",
            StitchType::Dc => "dc",
            StitchType::Tr => "tr",
            StitchType::Granny => "granny",
        }
    }

    pub fn yardage_factor(self) -> f64 {
        match self {
            StitchType::Sc => 48.0,
            StitchType::Hdc => 42.0,
            StitchType::Dc => 38.0,
            StitchType::Tr => 34.0,
            StitchType::Granny => 30.0,
        }
    }
}

impl fmt::Display for StitchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StitchType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|stitch| stitch.as_str() == wanted)
            .ok_or(ConfigError::UnknownStitch(wanted))
    }
}

/// Rule-of-thumb yarn estimate for a solid piece of `area_in2`.
pub fn estimate_yardage(area_in2: f64, sts_per_in: f64, stitch: StitchType) -> f64 {
    area_in2 * stitch.yardage_factor() / sts_per_in.max(MIN_PER_INCH)
}
