use crochet_planner::{
    BeanieSpec, BlanketSpec, Gauge, PlanMode, ProjectSpec, RectangleSpec, StitchType,
    closest_us, estimate_yardage,
    gauge::{
        beanie_height_from_circumference, cast_on_for_circumference, crown_increase_rounds,
        rows_for_height,
    },
    us_to_mm,
};
use std::str::FromStr;

#[test]
fn metric_gauge_converts_from_ten_centimetres() {
    let gauge = Gauge::from_metric(18.0, 28.0);
    assert!((gauge.sts_per_in - 4.572).abs() < 1e-3);
    assert!((gauge.rows_per_in - 7.112).abs() < 1e-3);
}

#[test]
fn cast_on_rounds_to_pattern_multiple() {
    // 22 * 4.5 * 0.95 = 94.05
    assert_eq!(cast_on_for_circumference(22.0, 4.5, 0.95, 1), 94);
    assert_eq!(cast_on_for_circumference(22.0, 4.5, 0.95, 4), 96);
    assert_eq!(cast_on_for_circumference(22.0, 4.5, 0.95, 8), 96);
    assert_eq!(cast_on_for_circumference(22.0, 4.5, 0.95, 0), 94);
}

#[test]
fn default_beanie_sizing() {
    assert!((beanie_height_from_circumference(22.0) - 7.92).abs() < 1e-9);
    assert_eq!(rows_for_height(7.92, 3.5), 28);
    assert_eq!(crown_increase_rounds(22.0), 11);

    let sizing = BeanieSpec::default().sizing(&Gauge::default());
    assert_eq!(sizing.cast_on, 94);
    assert_eq!(sizing.rows, 28);
    assert_eq!(sizing.crown_increase_rounds, 11);
}

#[test]
fn explicit_beanie_height_overrides_proportion() {
    let beanie = BeanieSpec {
        height_in: Some(9.0),
        ..BeanieSpec::default()
    };
    assert_eq!(beanie.sizing(&Gauge::new(4.0, 4.0)).rows, 36);
}

#[test]
fn blanket_layout_rounds_squares_up() {
    let layout = BlanketSpec::default().layout();
    assert_eq!((layout.squares_wide, layout.squares_high), (6, 8));
    assert_eq!(layout.total_squares, 48);
    assert!((layout.total_yardage - 1056.0).abs() < 1e-9);

    let odd = BlanketSpec {
        square_in: 5.0,
        width_in: 36.0,
        height_in: 48.0,
        yardage_per_square: 20.0,
    };
    assert_eq!(odd.layout().total_squares, 8 * 10);
}

#[test]
fn plan_modes_supply_work_and_labels() {
    let project = ProjectSpec::default();
    let rows = project.work_for(PlanMode::Beanie);
    assert_eq!((rows.total_work, rows.work_label.as_str()), (28, "rows"));
    let squares = project.work_for(PlanMode::Blanket);
    assert_eq!((squares.total_work, squares.work_label.as_str()), (48, "squares"));

    assert_eq!(PlanMode::Beanie.title_prefix(), "Crochet Beanie");
    assert_eq!(PlanMode::Blanket.title_prefix(), "Granny Blanket");
    assert_eq!(PlanMode::Blanket.tag(), "Blanket (granny squares)");
}

#[test]
fn plan_mode_parses_short_and_long_names() {
    assert_eq!(PlanMode::from_str("Blanket").unwrap(), PlanMode::Blanket);
    assert_eq!(PlanMode::from_str("beanie (rows)").unwrap(), PlanMode::Beanie);
    assert!(PlanMode::from_str("scarf").is_err());
}

#[test]
fn exact_halves_round_to_even() {
    // 7.5 * 3 = 22.5 and 21 / 2 = 10.5 are exact binary values
    assert_eq!(rows_for_height(7.5, 3.0), 22);
    assert_eq!(rows_for_height(8.5, 1.0), 8);
    assert_eq!(rows_for_height(9.5, 1.0), 10);
    assert_eq!(cast_on_for_circumference(21.0, 1.0, 1.0, 2), 20);
    assert_eq!(cast_on_for_circumference(23.0, 1.0, 1.0, 2), 24);
}

#[test]
fn rectangle_yardage_depends_on_stitch() {
    let gauge = Gauge::default();
    let wrap = RectangleSpec::default();
    assert!((wrap.area_in2() - 1080.0).abs() < 1e-9);
    assert!((wrap.yardage(&gauge) - 9120.0).abs() < 1e-9);

    let granny = RectangleSpec {
        stitch: StitchType::Granny,
        ..wrap
    };
    assert!((granny.yardage(&gauge) - 7200.0).abs() < 1e-9);
    assert!((estimate_yardage(100.0, 2.0, StitchType::Sc) - 2400.0).abs() < 1e-9);
    assert!(estimate_yardage(100.0, 0.0, StitchType::Hdc).is_finite());
}

#[test]
fn stitch_types_parse_from_abbreviations() {
    assert_eq!(StitchType::from_str(" HDC ").unwrap(), StitchType::Hdc);
    assert_eq!(StitchType::Tr.to_string(), "tr");
    assert!(StitchType::from_str("puff").is_err());
    assert_eq!(StitchType::Hdc.yardage_factor(), 42.0);
}

#[test]
fn hook_sizes_convert_both_ways() {
    assert_eq!(us_to_mm("H-8"), Some(5.0));
    assert_eq!(us_to_mm("k-10.5"), Some(6.5));
    assert_eq!(us_to_mm("Z"), None);

    assert_eq!(closest_us(5.2).us, "H-8");
    // equidistant from G-6 and 7
    assert_eq!(closest_us(4.25).us, "G-6");
    assert_eq!(closest_us(1.0).us, "B-1");
    assert_eq!(closest_us(25.0).us, "Q");
}

#[test]
fn defaults_pass_validation() {
    assert!(ProjectSpec::default().validate().is_ok());
    let metric = ProjectSpec {
        gauge: Gauge::from_metric(80.0, 120.0),
        ..ProjectSpec::default()
    };
    assert!(metric.validate().is_ok());
}

#[test]
fn project_json_without_rectangle_uses_defaults() {
    let mut value = serde_json::to_value(ProjectSpec::default()).unwrap();
    value.as_object_mut().unwrap().remove("rectangle");
    let project: ProjectSpec = serde_json::from_value(value).unwrap();
    assert_eq!(project.rectangle, RectangleSpec::default());
}
