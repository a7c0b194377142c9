pub mod calendar;
pub mod config;
pub mod export;
pub mod gauge;
pub mod hook;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod persistence;
pub mod planner;
pub mod project;
pub mod schedule;
pub mod timezone;

pub use calendar::WeekdayPattern;
pub use config::{ConfigError, PlanSettings, RuntimeConfig};
pub use export::{CALENDAR_MIME_TYPE, CalendarDocument, CalendarEvent, ExportOptions, export};
pub use gauge::{Gauge, StitchType, estimate_yardage};
pub use hook::{HOOK_SIZES, HookSize, closest_us, us_to_mm};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqlitePresetStore;
pub use persistence::{
    JsonPresetStore, PersistenceError, PresetStore, save_sessions_to_csv, write_sessions_csv,
};
pub use planner::{Planner, PlannerError, SessionSlot};
pub use project::{BeanieSpec, BlanketSpec, PlanMode, ProjectSpec, RectangleSpec, WorkQuantity};
pub use schedule::{ScheduleError, ScheduleRequest, Session, SessionPlan, schedule};
pub use timezone::{CalendarTimezone, TimezoneRule};
