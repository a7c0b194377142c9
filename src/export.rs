use crate::schedule::Session;
use crate::timezone::vtimezone_for;
use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub const PRODUCT_ID: &str = "-//Crochet Gauge Guru//Milestones//EN";
pub const CALENDAR_MIME_TYPE: &str = "text/calendar";

/// Maximum content line length in octets, excluding CRLF.
const MAX_LINE_OCTETS: usize = 75;
const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub title_prefix: String,
    pub work_label: String,
    /// Local hour of day (0-23) each session starts at.
    pub session_hour: u32,
    pub timezone_id: String,
    /// Free text folded into every event UID.
    pub plan_mode_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub stamp: DateTime<Utc>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub tzid: String,
    pub summary: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDocument {
    timezone: Vec<String>,
    events: Vec<CalendarEvent>,
}

/// Deterministic event identifier for a session.
pub fn event_uid(plan_mode_tag: &str, session: &Session) -> String {
    let slug = plan_mode_tag.replace(' ', "-").to_lowercase();
    format!(
        "cgg-{slug}-{}-{}@local",
        session.index,
        session.date.format("%Y-%m-%d")
    )
}

pub fn export(
    sessions: &[Session],
    options: &ExportOptions,
    generated_at: DateTime<Utc>,
) -> CalendarDocument {
    let start_time =
        NaiveTime::from_hms_opt(options.session_hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let events = sessions
        .iter()
        .map(|session| {
            let start = session.date.and_time(start_time);
            CalendarEvent {
                uid: event_uid(&options.plan_mode_tag, session),
                stamp: generated_at,
                start,
                // the last representable hour has no successor
                end: start
                    .checked_add_signed(TimeDelta::hours(1))
                    .unwrap_or(start),
                tzid: options.timezone_id.clone(),
                summary: format!("{} — Session {}", options.title_prefix, session.index),
                description: format!(
                    "Goal: {} {}. Generated by Crochet Gauge Guru.",
                    session.quantity, options.work_label
                ),
            }
        })
        .collect::<Vec<_>>();

    debug!(
        events = events.len(),
        timezone = %options.timezone_id,
        "built calendar document"
    );
    CalendarDocument {
        timezone: vtimezone_for(&options.timezone_id),
        events,
    }
}

impl CalendarDocument {
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn has_timezone(&self) -> bool {
        !self.timezone.is_empty()
    }

    /// Unfolded content lines in document order.
    pub fn content_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{PRODUCT_ID}"),
        ];
        lines.extend(self.timezone.iter().cloned());
        for event in &self.events {
            lines.extend(event.content_lines());
        }
        lines.push("END:VCALENDAR".to_string());
        lines
    }

    pub fn to_ics(&self) -> String {
        self.content_lines()
            .iter()
            .map(|line| fold_line(line))
            .collect()
    }
}

impl CalendarEvent {
    fn content_lines(&self) -> Vec<String> {
        vec![
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
            format!("DTSTAMP:{}", self.stamp.format(STAMP_FORMAT)),
            format!("DTSTART;TZID={}:{}", self.tzid, self.start.format(LOCAL_FORMAT)),
            format!("DTEND;TZID={}:{}", self.tzid, self.end.format(LOCAL_FORMAT)),
            format!("SUMMARY:{}", escape_text(&self.summary)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
            "END:VEVENT".to_string(),
        ]
    }
}

impl fmt::Display for CalendarDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ics())
    }
}

/// Escape a TEXT property value.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Fold a content line at 75 octets and terminate it with CRLF.
/// Continuation lines start with a single space and never split a UTF-8
/// sequence.
pub fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 2 + line.len() / MAX_LINE_OCTETS * 3);
    let mut rest = line;
    let mut limit = MAX_LINE_OCTETS;
    loop {
        if rest.len() <= limit {
            out.push_str(rest);
            out.push_str("\r\n");
            return out;
        }
        let mut end = limit;
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        out.push_str(&rest[..end]);
        out.push_str("\r\n ");
        rest = &rest[end..];
        // the leading space counts toward the next line
        limit = MAX_LINE_OCTETS - 1;
    }
}
