use crate::config::{ConfigError, PlanSettings};
use crate::export::{CalendarDocument, ExportOptions, export};
use crate::project::{ProjectSpec, WorkQuantity};
use crate::schedule::{ScheduleError, ScheduleRequest, SessionPlan, schedule};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// A session with its wall-clock start resolved in the plan's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSlot {
    pub index: u32,
    pub date: NaiveDate,
    pub quantity: u32,
    pub work_label: String,
    pub local_start: NaiveDateTime,
    pub start_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Planner {
    pub settings: PlanSettings,
    pub project: ProjectSpec,
}

impl Planner {
    pub fn new(settings: PlanSettings, project: ProjectSpec) -> Self {
        Self { settings, project }
    }

    pub fn work(&self) -> WorkQuantity {
        self.project.work_for(self.settings.mode)
    }

    pub fn schedule_request(&self) -> ScheduleRequest {
        let work = self.work();
        ScheduleRequest::new(
            self.settings.start_date,
            self.settings.weeks,
            self.settings.sessions_per_week,
            work.total_work,
            work.work_label,
        )
    }

    pub fn export_options(&self) -> ExportOptions {
        let mode = self.settings.mode;
        ExportOptions {
            title_prefix: mode.title_prefix().to_string(),
            work_label: mode.work_label().to_string(),
            session_hour: self.settings.session_hour,
            timezone_id: self.settings.timezone.clone(),
            plan_mode_tag: mode.tag().to_string(),
        }
    }

    /// Plan settings first, then project measurements.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settings.validate()?;
        self.project.validate()
    }

    pub fn session_plan(&self) -> Result<SessionPlan, PlannerError> {
        self.validate()?;
        Ok(schedule(&self.schedule_request())?)
    }

    pub fn calendar(&self, generated_at: DateTime<Utc>) -> Result<CalendarDocument, PlannerError> {
        let plan = self.session_plan()?;
        Ok(export(&plan.sessions, &self.export_options(), generated_at))
    }

    pub fn slots(&self) -> Result<Vec<SessionSlot>, PlannerError> {
        let plan = self.session_plan()?;
        self.slots_for(&plan)
    }

    /// Resolve start times for a plan already produced by [`Self::session_plan`].
    pub fn slots_for(&self, plan: &SessionPlan) -> Result<Vec<SessionSlot>, PlannerError> {
        let timezone = self.settings.calendar_timezone()?;
        let time = NaiveTime::from_hms_opt(self.settings.session_hour, 0, 0).ok_or(
            ConfigError::OutOfRange {
                field: "session_hour",
                value: self.settings.session_hour,
                min: 0,
                max: 23,
            },
        )?;
        plan.sessions
            .iter()
            .map(|session| -> Result<SessionSlot, PlannerError> {
                let local_start = session.date.and_time(time);
                let start_utc = timezone.to_utc(local_start).ok_or(
                    ScheduleError::DateOutOfRange {
                        start: self.settings.start_date,
                    },
                )?;
                Ok(SessionSlot {
                    index: session.index,
                    date: session.date,
                    quantity: session.quantity,
                    work_label: plan.work_label.clone(),
                    local_start,
                    start_utc,
                })
            })
            .collect()
    }

    pub fn file_name(&self) -> String {
        self.settings.file_name()
    }

    pub fn preview(&self) -> Result<Vec<String>, PlannerError> {
        let lines = self.session_plan()?.preview_lines();
        if lines.is_empty() {
            return Ok(vec!["No sessions generated.".to_string()]);
        }
        Ok(lines)
    }
}
