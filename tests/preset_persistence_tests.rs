use chrono::NaiveDate;
use crochet_planner::{
    JsonPresetStore, PersistenceError, PlanMode, PlanSettings, Planner, PresetStore, ProjectSpec,
    save_sessions_to_csv, write_sessions_csv,
};
use tempfile::{NamedTempFile, TempDir};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_planner() -> Planner {
    let mut settings = PlanSettings::starting(d(2024, 1, 1));
    settings.mode = PlanMode::Blanket;
    settings.weeks = 6;
    settings.timezone = "Europe/London".into();
    let mut project = ProjectSpec::default();
    project.blanket.square_in = 4.0;
    Planner::new(settings, project)
}

#[test]
fn json_store_round_trips_presets() {
    let dir = TempDir::new().unwrap();
    let store = JsonPresetStore::new(dir.path().join("presets.json"));

    store.save_preset("  winter  ", &sample_planner()).expect("save");
    store
        .save_preset("beanie", &Planner::new(PlanSettings::starting(d(2024, 2, 1)), ProjectSpec::default()))
        .expect("save second");

    let loaded = store
        .load_preset("winter")
        .expect("load")
        .expect("preset exists");
    assert_eq!(loaded, sample_planner());
    assert_eq!(store.list_presets().unwrap(), vec!["beanie", "winter"]);
    assert!(!dir.path().join("presets.json.tmp").exists());
}

#[test]
fn saving_over_a_name_replaces_it() {
    let dir = TempDir::new().unwrap();
    let store = JsonPresetStore::new(dir.path().join("presets.json"));
    store.save_preset("p", &sample_planner()).unwrap();

    let mut changed = sample_planner();
    changed.settings.weeks = 10;
    store.save_preset("p", &changed).unwrap();

    assert_eq!(store.list_presets().unwrap().len(), 1);
    assert_eq!(store.fetch_preset("p").unwrap().settings.weeks, 10);
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonPresetStore::new(dir.path().join("absent.json"));
    assert!(store.list_presets().unwrap().is_empty());
    assert!(store.load_preset("anything").unwrap().is_none());
    assert!(!store.delete_preset("anything").unwrap());
    assert!(matches!(
        store.fetch_preset("anything"),
        Err(PersistenceError::NotFound(name)) if name == "anything"
    ));
}

#[test]
fn delete_removes_only_the_named_preset() {
    let dir = TempDir::new().unwrap();
    let store = JsonPresetStore::new(dir.path().join("presets.json"));
    store.save_preset("a", &sample_planner()).unwrap();
    store.save_preset("b", &sample_planner()).unwrap();

    assert!(store.delete_preset("a").unwrap());
    assert_eq!(store.list_presets().unwrap(), vec!["b"]);
}

#[test]
fn blank_names_and_invalid_settings_are_rejected() {
    let dir = TempDir::new().unwrap();
    let store = JsonPresetStore::new(dir.path().join("presets.json"));
    assert!(matches!(
        store.save_preset("   ", &sample_planner()),
        Err(PersistenceError::InvalidData(_))
    ));

    let mut broken = sample_planner();
    broken.settings.session_hour = 3;
    assert!(matches!(
        store.save_preset("late", &broken),
        Err(PersistenceError::InvalidData(_))
    ));
    assert!(store.list_presets().unwrap().is_empty());
}

#[test]
fn corrupt_file_surfaces_a_serialization_error() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "{ not json").unwrap();
    let store = JsonPresetStore::new(file.path());
    assert!(matches!(
        store.list_presets(),
        Err(PersistenceError::Serialization(_))
    ));
}

#[test]
fn sessions_export_to_csv_with_utc_column() {
    let planner = Planner::new(PlanSettings::starting(d(2024, 1, 1)), ProjectSpec::default());
    let slots = planner.slots().unwrap();

    let mut buffer = Vec::new();
    write_sessions_csv(&slots, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("index,date,quantity,work_label,local_start,start_utc")
    );
    assert_eq!(
        lines.next(),
        Some("1,2024-01-01,3,rows,2024-01-01T19:00:00,2024-01-02T01:00:00Z")
    );
    assert_eq!(text.lines().count(), 1 + slots.len());

    let file = NamedTempFile::new().unwrap();
    save_sessions_to_csv(&slots, file.path()).unwrap();
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), text);
}

#[test]
fn empty_session_list_is_not_written() {
    let file = NamedTempFile::new().unwrap();
    assert!(matches!(
        save_sessions_to_csv(&[], file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}
