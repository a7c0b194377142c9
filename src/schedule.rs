use crate::calendar::{WeekdayPattern, week_anchor};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub start_date: NaiveDate,
    pub weeks: u32,
    pub sessions_per_week: u32,
    pub total_work: u32,
    pub work_label: String,
}

impl ScheduleRequest {
    pub fn new(
        start_date: NaiveDate,
        weeks: u32,
        sessions_per_week: u32,
        total_work: u32,
        work_label: impl Into<String>,
    ) -> Self {
        Self {
            start_date,
            weeks,
            sessions_per_week,
            total_work,
            work_label: work_label.into(),
        }
    }

    /// Upper bound on the number of sessions this request can produce.
    pub fn total_sessions(&self) -> u32 {
        self.weeks.saturating_mul(self.sessions_per_week)
    }
}

/// One scheduled unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 1-based position in the plan.
    pub index: u32,
    pub date: NaiveDate,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error(
        "at least one session is required (weeks={weeks}, sessions_per_week={sessions_per_week})"
    )]
    NoSessions { weeks: u32, sessions_per_week: u32 },
    #[error("session dates starting {start} fall outside the supported calendar range")]
    DateOutOfRange { start: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub sessions: Vec<Session>,
    pub requested_sessions: u32,
    pub per_session: u32,
    pub total_work: u32,
    pub work_label: String,
}

impl SessionPlan {
    /// Fewer dates were generated than `weeks * sessions_per_week`.
    pub fn is_degenerate(&self) -> bool {
        self.shortfall() > 0
    }

    pub fn shortfall(&self) -> u32 {
        self.requested_sessions
            .saturating_sub(self.sessions.len() as u32)
    }

    pub fn assigned_work(&self) -> u32 {
        self.sessions.iter().map(|s| s.quantity).sum()
    }

    /// Work left over when a shortened plan cannot absorb `total_work`.
    /// Always zero for placeholder plans (`total_work == 0`).
    pub fn unassigned_work(&self) -> u32 {
        if self.total_work == 0 {
            return 0;
        }
        self.total_work.saturating_sub(self.assigned_work())
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.sessions.first().map(|s| s.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.sessions.last().map(|s| s.date)
    }

    /// One line per session, e.g. `01. 2024-01-01 - 3 rows`.
    pub fn preview_lines(&self) -> Vec<String> {
        self.sessions
            .iter()
            .map(|s| {
                format!(
                    "{:02}. {} - {} {}",
                    s.index,
                    s.date.format("%Y-%m-%d"),
                    s.quantity,
                    self.work_label
                )
            })
            .collect()
    }
}

/// Candidate session dates in chronological order, capped at the requested
/// session count. Dates before `start_date` are dropped. Generation stops at
/// the end of the supported calendar; it only fails if no date fits at all.
pub fn session_dates(request: &ScheduleRequest) -> Result<Vec<NaiveDate>, ScheduleError> {
    let total_sessions = request.total_sessions();
    if total_sessions == 0 {
        return Err(ScheduleError::NoSessions {
            weeks: request.weeks,
            sessions_per_week: request.sessions_per_week,
        });
    }

    let pattern = WeekdayPattern::for_sessions_per_week(request.sessions_per_week);
    debug!(
        sessions_per_week = request.sessions_per_week,
        weekdays = ?pattern.indices(),
        "derived weekday pattern"
    );

    let out_of_range = || ScheduleError::DateOutOfRange {
        start: request.start_date,
    };
    let anchor = week_anchor(request.start_date).ok_or_else(out_of_range)?;
    let mut dates = Vec::with_capacity(total_sessions as usize);
    'weeks: for week in 0..request.weeks {
        for offset in pattern.indices() {
            let days = u64::from(offset) + u64::from(week) * 7;
            let Some(date) = anchor.checked_add_days(Days::new(days)) else {
                // Later candidates only move further past the end of the range.
                if dates.is_empty() {
                    return Err(out_of_range());
                }
                debug!(
                    start = %request.start_date,
                    generated = dates.len(),
                    "calendar range exhausted"
                );
                break 'weeks;
            };
            if date < request.start_date {
                continue;
            }
            dates.push(date);
            if dates.len() == total_sessions as usize {
                break 'weeks;
            }
        }
    }
    Ok(dates)
}

/// Quantity each session aims for: `ceil(total_work / total_sessions)`,
/// never below one.
pub fn per_session_quantity(total_work: u32, total_sessions: u32) -> u32 {
    if total_work == 0 || total_sessions == 0 {
        return 1;
    }
    total_work.div_ceil(total_sessions).max(1)
}

pub fn schedule(request: &ScheduleRequest) -> Result<SessionPlan, ScheduleError> {
    let dates = session_dates(request)?;
    let requested_sessions = request.total_sessions();
    let per_session = per_session_quantity(request.total_work, requested_sessions);

    let mut remaining = request.total_work;
    let sessions: Vec<Session> = dates
        .into_iter()
        .zip(1..)
        .map(|(date, index)| {
            let quantity = if request.total_work > 0 {
                per_session.min(remaining)
            } else {
                per_session
            };
            remaining = remaining.saturating_sub(quantity);
            Session {
                index,
                date,
                quantity,
            }
        })
        .collect();

    let plan = SessionPlan {
        sessions,
        requested_sessions,
        per_session,
        total_work: request.total_work,
        work_label: request.work_label.clone(),
    };

    if plan.is_degenerate() {
        warn!(
            start_date = %request.start_date,
            requested = requested_sessions,
            generated = plan.sessions.len(),
            unassigned_work = plan.unassigned_work(),
            "schedule generated fewer sessions than requested"
        );
    }
    Ok(plan)
}
