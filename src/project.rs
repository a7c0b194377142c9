use crate::config::ConfigError;
use crate::gauge::{
    Gauge, INCHES_PER_10_CM, StitchType, beanie_height_from_circumference,
    cast_on_for_circumference, crown_increase_rounds, estimate_yardage, rows_for_height,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Input bounds in inches, matching the calculator widgets. A metric swatch
/// of 80 sts per 10 cm is the densest gauge accepted.
pub const STS_PER_IN_RANGE: RangeInclusive<f64> = 0.1..=80.0 / INCHES_PER_10_CM;
pub const ROWS_PER_IN_RANGE: RangeInclusive<f64> = 0.1..=40.0;
pub const HEAD_CIRCUMFERENCE_RANGE: RangeInclusive<f64> = 12.0..=28.0;
pub const EASE_RANGE: RangeInclusive<f64> = 0.85..=1.05;
pub const STITCH_MULTIPLES: [u32; 6] = [1, 2, 3, 4, 6, 8];
pub const BEANIE_HEIGHT_RANGE: RangeInclusive<f64> = 5.0..=14.0;
pub const RECTANGLE_SIDE_RANGE: RangeInclusive<f64> = 2.0..=120.0;
pub const SQUARE_SIZE_RANGE: RangeInclusive<f64> = 2.0..=16.0;
pub const BLANKET_SIDE_RANGE: RangeInclusive<f64> = 12.0..=120.0;
pub const YARDAGE_PER_SQUARE_RANGE: RangeInclusive<f64> = 5.0..=200.0;

/// Which project the milestones are planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    #[default]
    Beanie,
    Blanket,
}

impl PlanMode {
    pub const ALL: [PlanMode; 2] = [PlanMode::Beanie, PlanMode::Blanket];

    /// Plan type used in download file names.
    pub fn as_str(self) -> &'static str {
        match self {
            PlanMode::Beanie => "beanie",
            PlanMode::Blanket => "blanket",
        }
    }

    /// Human label, also the source of event UIDs.
    pub fn tag(self) -> &'static str {
        match self {
            PlanMode::Beanie => "Beanie (rows)",
            PlanMode::Blanket => "Blanket (granny squares)",
        }
    }

    pub fn title_prefix(self) -> &'static str {
        match self {
            PlanMode::Beanie => "Crochet Beanie",
            PlanMode::Blanket => "Granny Blanket",
        }
    }

    pub fn work_label(self) -> &'static str {
        match self {
            PlanMode::Beanie => "rows",
            PlanMode::Blanket => "squares",
        }
    }
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| wanted == mode.as_str() || wanted == mode.tag().to_ascii_lowercase())
            .ok_or(ConfigError::UnknownPlanMode(wanted))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeanieSpec {
    pub head_circumference_in: f64,
    /// Below 1.0 gives negative ease (a snug fit).
    pub ease: f64,
    /// Cast-on is rounded to this stitch multiple (rib or pattern repeat).
    pub multiple: u32,
    /// Defaults to a proportion of the head circumference when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_in: Option<f64>,
}

impl Default for BeanieSpec {
    fn default() -> Self {
        Self {
            head_circumference_in: 22.0,
            ease: 0.95,
            multiple: 2,
            height_in: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeanieSizing {
    pub cast_on: u32,
    pub rows: u32,
    pub crown_increase_rounds: u32,
    pub height_in: f64,
}

impl BeanieSpec {
    pub fn height_in(&self) -> f64 {
        self.height_in.unwrap_or_else(|| {
            (beanie_height_from_circumference(self.head_circumference_in) * 100.0).round_ties_even()
                / 100.0
        })
    }

    pub fn sizing(&self, gauge: &Gauge) -> BeanieSizing {
        let height_in = self.height_in();
        BeanieSizing {
            cast_on: cast_on_for_circumference(
                self.head_circumference_in,
                gauge.sts_per_in,
                self.ease,
                self.multiple,
            ),
            rows: rows_for_height(height_in, gauge.rows_per_in),
            crown_increase_rounds: crown_increase_rounds(self.head_circumference_in),
            height_in,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlanketSpec {
    pub square_in: f64,
    pub width_in: f64,
    pub height_in: f64,
    pub yardage_per_square: f64,
}

impl Default for BlanketSpec {
    fn default() -> Self {
        Self {
            square_in: 6.0,
            width_in: 36.0,
            height_in: 48.0,
            yardage_per_square: 22.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlanketLayout {
    pub squares_wide: u32,
    pub squares_high: u32,
    pub total_squares: u32,
    pub total_yardage: f64,
}

impl BlanketSpec {
    pub fn layout(&self) -> BlanketLayout {
        let square = if self.square_in > 0.0 { self.square_in } else { 1.0 };
        let squares_wide = (self.width_in / square).ceil().max(0.0) as u32;
        let squares_high = (self.height_in / square).ceil().max(0.0) as u32;
        let total_squares = squares_wide.saturating_mul(squares_high);
        BlanketLayout {
            squares_wide,
            squares_high,
            total_squares,
            total_yardage: f64::from(total_squares) * self.yardage_per_square,
        }
    }
}

/// The two values the scheduler needs from a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkQuantity {
    pub total_work: u32,
    pub work_label: String,
}

/// A solid rectangle such as a wrap or scarf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleSpec {
    pub width_in: f64,
    pub height_in: f64,
    #[serde(default)]
    pub stitch: StitchType,
}

impl Default for RectangleSpec {
    fn default() -> Self {
        Self {
            width_in: 18.0,
            height_in: 60.0,
            stitch: StitchType::Dc,
        }
    }
}

impl RectangleSpec {
    pub fn area_in2(&self) -> f64 {
        self.width_in * self.height_in
    }

    pub fn yardage(&self, gauge: &Gauge) -> f64 {
        estimate_yardage(self.area_in2(), gauge.sts_per_in, self.stitch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub gauge: Gauge,
    pub beanie: BeanieSpec,
    pub blanket: BlanketSpec,
    /// Absent in presets written before rectangles were tracked.
    #[serde(default)]
    pub rectangle: RectangleSpec,
}

fn check_measurement(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::MeasurementOutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

impl ProjectSpec {
    /// Reject measurements outside the calculator input ranges, including NaN.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_measurement("sts_per_in", self.gauge.sts_per_in, &STS_PER_IN_RANGE)?;
        check_measurement("rows_per_in", self.gauge.rows_per_in, &ROWS_PER_IN_RANGE)?;

        let beanie = &self.beanie;
        check_measurement(
            "head_circumference_in",
            beanie.head_circumference_in,
            &HEAD_CIRCUMFERENCE_RANGE,
        )?;
        check_measurement("ease", beanie.ease, &EASE_RANGE)?;
        if !STITCH_MULTIPLES.contains(&beanie.multiple) {
            return Err(ConfigError::UnsupportedMultiple(beanie.multiple));
        }
        if let Some(height) = beanie.height_in {
            check_measurement("beanie.height_in", height, &BEANIE_HEIGHT_RANGE)?;
        }

        let blanket = &self.blanket;
        check_measurement("square_in", blanket.square_in, &SQUARE_SIZE_RANGE)?;
        check_measurement("blanket.width_in", blanket.width_in, &BLANKET_SIDE_RANGE)?;
        check_measurement("blanket.height_in", blanket.height_in, &BLANKET_SIDE_RANGE)?;
        check_measurement(
            "yardage_per_square",
            blanket.yardage_per_square,
            &YARDAGE_PER_SQUARE_RANGE,
        )?;

        check_measurement("rectangle.width_in", self.rectangle.width_in, &RECTANGLE_SIDE_RANGE)?;
        check_measurement("rectangle.height_in", self.rectangle.height_in, &RECTANGLE_SIDE_RANGE)?;
        Ok(())
    }

    pub fn work_for(&self, mode: PlanMode) -> WorkQuantity {
        let total_work = match mode {
            PlanMode::Beanie => self.beanie.sizing(&self.gauge).rows,
            PlanMode::Blanket => self.blanket.layout().total_squares,
        };
        WorkQuantity {
            total_work,
            work_label: mode.work_label().to_string(),
        }
    }
}
