//! Hard-coded timezone rules for the zones a plan can be exported in.
//!
//! No timezone database is consulted. Each supported zone maps to one
//! [`TimezoneRule`] value and the VTIMEZONE block is rendered from it.

use crate::calendar::{last_weekday, nth_weekday};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, Utc,
    Weekday,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference year for VTIMEZONE `DTSTART` lines.
const RULE_EPOCH_YEAR: i32 = 1970;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalendarTimezone {
    #[serde(rename = "America/Chicago")]
    Chicago,
    #[serde(rename = "America/New_York")]
    NewYork,
    #[serde(rename = "America/Los_Angeles")]
    LosAngeles,
    #[serde(rename = "Europe/London")]
    London,
    #[serde(rename = "Europe/Paris")]
    Paris,
    #[serde(rename = "UTC")]
    Utc,
}

/// Which occurrence of a weekday within the month a transition falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekOfMonth {
    Nth(u32),
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneOffset {
    /// Seconds east of UTC.
    pub seconds: i32,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub month: u32,
    pub week: WeekOfMonth,
    pub weekday: Weekday,
    /// Local wall-clock time, in the offset in force before the change.
    pub hour: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimezoneRule {
    FixedOffset(ZoneOffset),
    AnnualDst {
        standard: ZoneOffset,
        daylight: ZoneOffset,
        dst_start: Transition,
        dst_end: Transition,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported timezone '{0}'")]
pub struct UnknownTimezone(pub String);

const fn offset(hours: i32, name: &'static str) -> ZoneOffset {
    ZoneOffset {
        seconds: hours * 3600,
        name,
    }
}

const US_DST_START: Transition = Transition {
    month: 3,
    week: WeekOfMonth::Nth(2),
    weekday: Weekday::Sun,
    hour: 2,
};

const US_DST_END: Transition = Transition {
    month: 11,
    week: WeekOfMonth::Nth(1),
    weekday: Weekday::Sun,
    hour: 2,
};

const fn eu_transition(month: u32, hour: u32) -> Transition {
    Transition {
        month,
        week: WeekOfMonth::Last,
        weekday: Weekday::Sun,
        hour,
    }
}

impl CalendarTimezone {
    pub const ALL: [CalendarTimezone; 6] = [
        CalendarTimezone::Chicago,
        CalendarTimezone::NewYork,
        CalendarTimezone::LosAngeles,
        CalendarTimezone::London,
        CalendarTimezone::Paris,
        CalendarTimezone::Utc,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CalendarTimezone::Chicago => "America/Chicago",
            CalendarTimezone::NewYork => "America/New_York",
            CalendarTimezone::LosAngeles => "America/Los_Angeles",
            CalendarTimezone::London => "Europe/London",
            CalendarTimezone::Paris => "Europe/Paris",
            CalendarTimezone::Utc => "UTC",
        }
    }

    pub fn rule(self) -> TimezoneRule {
        match self {
            CalendarTimezone::Chicago => TimezoneRule::AnnualDst {
                standard: offset(-6, "CST"),
                daylight: offset(-5, "CDT"),
                dst_start: US_DST_START,
                dst_end: US_DST_END,
            },
            CalendarTimezone::NewYork => TimezoneRule::AnnualDst {
                standard: offset(-5, "EST"),
                daylight: offset(-4, "EDT"),
                dst_start: US_DST_START,
                dst_end: US_DST_END,
            },
            CalendarTimezone::LosAngeles => TimezoneRule::AnnualDst {
                standard: offset(-8, "PST"),
                daylight: offset(-7, "PDT"),
                dst_start: US_DST_START,
                dst_end: US_DST_END,
            },
            CalendarTimezone::London => TimezoneRule::AnnualDst {
                standard: offset(0, "GMT"),
                daylight: offset(1, "BST"),
                dst_start: eu_transition(3, 1),
                dst_end: eu_transition(10, 2),
            },
            CalendarTimezone::Paris => TimezoneRule::AnnualDst {
                standard: offset(1, "CET"),
                daylight: offset(2, "CEST"),
                dst_start: eu_transition(3, 2),
                dst_end: eu_transition(10, 3),
            },
            CalendarTimezone::Utc => TimezoneRule::FixedOffset(offset(0, "UTC")),
        }
    }

    /// UTC offset in force at a local wall-clock time.
    pub fn offset_at(self, local: NaiveDateTime) -> FixedOffset {
        self.rule().offset_at(local).fixed()
    }

    /// `None` when the instant falls outside chrono's range.
    pub fn to_utc(self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let offset = self.offset_at(local);
        local
            .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
            .map(|utc| utc.and_utc())
    }

    /// Content lines of the VTIMEZONE block, without line terminators.
    pub fn vtimezone_lines(self) -> Vec<String> {
        let id = self.id();
        let mut lines = vec![
            "BEGIN:VTIMEZONE".to_string(),
            format!("TZID:{id}"),
            format!("X-LIC-LOCATION:{id}"),
        ];
        match self.rule() {
            TimezoneRule::FixedOffset(zone) => {
                lines.extend(observance("STANDARD", zone, zone, "19700101T000000", None));
            }
            TimezoneRule::AnnualDst {
                standard,
                daylight,
                dst_start,
                dst_end,
            } => {
                lines.extend(observance(
                    "DAYLIGHT",
                    standard,
                    daylight,
                    &dst_start.epoch_dtstart(),
                    Some(dst_start.rrule()),
                ));
                lines.extend(observance(
                    "STANDARD",
                    daylight,
                    standard,
                    &dst_end.epoch_dtstart(),
                    Some(dst_end.rrule()),
                ));
            }
        }
        lines.push("END:VTIMEZONE".to_string());
        lines
    }
}

fn observance(
    kind: &str,
    from: ZoneOffset,
    to: ZoneOffset,
    dtstart: &str,
    rrule: Option<String>,
) -> Vec<String> {
    let mut lines = vec![
        format!("BEGIN:{kind}"),
        format!("TZOFFSETFROM:{}", from.ics()),
        format!("TZOFFSETTO:{}", to.ics()),
        format!("TZNAME:{}", to.name),
        format!("DTSTART:{dtstart}"),
    ];
    if let Some(rrule) = rrule {
        lines.push(rrule);
    }
    lines.push(format!("END:{kind}"));
    lines
}

impl ZoneOffset {
    /// `+HHMM` / `-HHMM` as used by TZOFFSETFROM and TZOFFSETTO.
    pub fn ics(self) -> String {
        let sign = if self.seconds < 0 { '-' } else { '+' };
        let minutes = self.seconds.unsigned_abs() / 60;
        format!("{sign}{:02}{:02}", minutes / 60, minutes % 60)
    }

    pub fn fixed(self) -> FixedOffset {
        FixedOffset::east_opt(self.seconds).unwrap_or_else(|| Utc.fix())
    }
}

impl Transition {
    pub fn date_in(self, year: i32) -> Option<NaiveDate> {
        match self.week {
            WeekOfMonth::Nth(n) => nth_weekday(year, self.month, self.weekday, n),
            WeekOfMonth::Last => last_weekday(year, self.month, self.weekday),
        }
    }

    pub fn local_instant_in(self, year: i32) -> Option<NaiveDateTime> {
        let time = NaiveTime::from_hms_opt(self.hour, 0, 0)?;
        Some(self.date_in(year)?.and_time(time))
    }

    fn epoch_dtstart(self) -> String {
        self.local_instant_in(RULE_EPOCH_YEAR)
            .map(|dt| dt.format("%Y%m%dT%H%M%S").to_string())
            .unwrap_or_default()
    }

    fn rrule(self) -> String {
        let ordinal = match self.week {
            WeekOfMonth::Nth(n) => n.to_string(),
            WeekOfMonth::Last => "-1".to_string(),
        };
        format!(
            "RRULE:FREQ=YEARLY;BYMONTH={};BYDAY={ordinal}{}",
            self.month,
            weekday_code(self.weekday)
        )
    }
}

fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

impl TimezoneRule {
    /// Offset in force at `local`. Times skipped by the spring change count as
    /// daylight; times repeated by the autumn change count as standard.
    pub fn offset_at(self, local: NaiveDateTime) -> ZoneOffset {
        match self {
            TimezoneRule::FixedOffset(zone) => zone,
            TimezoneRule::AnnualDst {
                standard,
                daylight,
                dst_start,
                dst_end,
            } => {
                let year = local.year();
                let (Some(begins), Some(ends)) =
                    (dst_start.local_instant_in(year), dst_end.local_instant_in(year))
                else {
                    return standard;
                };
                // `ends` is expressed in daylight time; shift it onto the
                // standard wall clock so the repeated hour lands in standard.
                let shift = TimeDelta::seconds(i64::from(daylight.seconds - standard.seconds));
                if local >= begins && local < ends - shift {
                    daylight
                } else {
                    standard
                }
            }
        }
    }
}

impl fmt::Display for CalendarTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CalendarTimezone {
    type Err = UnknownTimezone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Self::ALL
            .into_iter()
            .find(|tz| tz.id() == id)
            .ok_or_else(|| UnknownTimezone(id.to_string()))
    }
}

/// VTIMEZONE lines for a raw identifier; empty when the zone is unsupported.
pub fn vtimezone_for(timezone_id: &str) -> Vec<String> {
    match CalendarTimezone::from_str(timezone_id) {
        Ok(tz) => tz.vtimezone_lines(),
        Err(err) => {
            tracing::warn!(error = %err, "omitting timezone block");
            Vec::new()
        }
    }
}
