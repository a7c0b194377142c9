use chrono::{NaiveDate, TimeZone, Utc};
use crochet_planner::{
    ConfigError, PlanMode, PlanSettings, Planner, PlannerError, ProjectSpec, RuntimeConfig,
    ScheduleError, StitchType,
    config::{HTTP_ADDR_ENV, LOG_LEVEL_ENV, PRESETS_PATH_ENV},
};
use std::collections::HashMap;
use std::path::PathBuf;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn planner() -> Planner {
    Planner::new(PlanSettings::starting(d(2024, 1, 1)), ProjectSpec::default())
}

#[test]
fn settings_reject_values_outside_input_ranges() {
    let mut settings = PlanSettings::starting(d(2024, 1, 1));
    assert!(settings.validate().is_ok());

    settings.weeks = 53;
    assert_eq!(
        settings.validate().unwrap_err(),
        ConfigError::OutOfRange {
            field: "weeks",
            value: 53,
            min: 1,
            max: 52
        }
    );

    settings.weeks = 4;
    settings.sessions_per_week = 0;
    assert!(settings.validate().is_err());

    settings.sessions_per_week = 14;
    settings.session_hour = 5;
    assert!(settings.validate().is_err());

    settings.session_hour = 22;
    settings.timezone = "Asia/Tokyo".into();
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::UnknownTimezone(_))
    ));
}

#[test]
fn default_beanie_plan_spreads_rows_over_twelve_sessions() {
    let plan = planner().session_plan().unwrap();
    // 28 rows over 4 weeks x 3 sessions
    assert_eq!(plan.requested_sessions, 12);
    assert_eq!(plan.per_session, 3);
    assert_eq!(plan.sessions.len(), 12);
    assert_eq!(plan.assigned_work(), 28);
    assert_eq!(plan.sessions.last().map(|s| s.quantity), Some(0));
}

#[test]
fn blanket_mode_changes_labels_and_file_name() {
    let mut planner = planner();
    planner.settings.mode = PlanMode::Blanket;
    assert_eq!(planner.file_name(), "crochet_blanket_milestones.ics");
    let options = planner.export_options();
    assert_eq!(options.title_prefix, "Granny Blanket");
    assert_eq!(options.work_label, "squares");

    let ics = planner
        .calendar(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .unwrap()
        .to_ics();
    assert!(ics.contains("UID:cgg-blanket-(granny-squares)-1-2024-01-01@local"));
    assert!(ics.contains("DESCRIPTION:Goal: 4 squares. Generated by Crochet Gauge Guru."));
}

#[test]
fn invalid_settings_stop_before_scheduling() {
    let mut planner = planner();
    planner.settings.weeks = 0;
    assert!(matches!(
        planner.session_plan(),
        Err(PlannerError::Config(ConfigError::OutOfRange { field: "weeks", .. }))
    ));
    assert!(planner.calendar(Utc::now()).is_err());
}

#[test]
fn slots_resolve_utc_start_times() {
    let slots = planner().slots().unwrap();
    assert_eq!(slots.len(), 12);
    assert_eq!(
        slots[0].start_utc,
        Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap()
    );
    assert_eq!(slots[0].work_label, "rows");
}

#[test]
fn preview_reports_lines() {
    let lines = planner().preview().unwrap();
    assert_eq!(lines.len(), 12);
    assert_eq!(lines[0], "01. 2024-01-01 - 3 rows");
}

#[test]
fn runtime_config_reads_overrides() {
    let vars: HashMap<&str, &str> = HashMap::from([
        (HTTP_ADDR_ENV, "127.0.0.1:8080"),
        (LOG_LEVEL_ENV, "debug"),
        (PRESETS_PATH_ENV, "/tmp/presets.json"),
    ]);
    let config = RuntimeConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
    assert_eq!(config.http_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.presets_path, PathBuf::from("/tmp/presets.json"));

    let defaults = RuntimeConfig::from_lookup(|_| None).unwrap();
    assert_eq!(defaults, RuntimeConfig::default());

    let err = RuntimeConfig::from_lookup(|name| {
        (name == HTTP_ADDR_ENV).then(|| "not-an-addr".to_string())
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnv { .. }));
}

#[test]
fn slots_for_reuses_a_computed_plan() {
    let planner = planner();
    let plan = planner.session_plan().unwrap();
    assert_eq!(planner.slots_for(&plan).unwrap(), planner.slots().unwrap());
}

#[test]
fn start_in_the_last_calendar_week_yields_a_short_plan() {
    let mut settings = PlanSettings::starting(NaiveDate::MAX);
    settings.weeks = 1;
    settings.sessions_per_week = 7;
    settings.timezone = "UTC".into();
    let mut planner = Planner::new(settings, ProjectSpec::default());

    let plan = planner.session_plan().unwrap();
    assert_eq!(plan.sessions.len(), 1);
    assert!(plan.is_degenerate());
    assert_eq!(planner.slots().unwrap()[0].date, NaiveDate::MAX);

    // 19:00 in Chicago is past the last UTC instant chrono can hold
    planner.settings.timezone = "America/Chicago".into();
    assert!(matches!(
        planner.slots(),
        Err(PlannerError::Schedule(ScheduleError::DateOutOfRange { .. }))
    ));
}

#[test]
fn invalid_measurements_stop_before_scheduling() {
    let mut nan_gauge = planner();
    nan_gauge.project.gauge.rows_per_in = f64::NAN;
    assert!(matches!(
        nan_gauge.session_plan(),
        Err(PlannerError::Config(ConfigError::MeasurementOutOfRange {
            field: "rows_per_in",
            ..
        }))
    ));

    let mut flat_square = planner();
    flat_square.project.blanket.square_in = 0.0;
    assert!(matches!(
        flat_square.validate(),
        Err(ConfigError::MeasurementOutOfRange { field: "square_in", .. })
    ));

    let mut odd_multiple = planner();
    odd_multiple.project.beanie.multiple = 5;
    assert_eq!(
        odd_multiple.validate(),
        Err(ConfigError::UnsupportedMultiple(5))
    );

    let mut wide_wrap = planner();
    wide_wrap.project.rectangle.stitch = StitchType::Tr;
    wide_wrap.project.rectangle.width_in = 121.0;
    assert!(wide_wrap.validate().is_err());
}
