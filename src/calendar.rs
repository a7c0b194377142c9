use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Weekdays on which sessions fall, ordered Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayPattern {
    weekdays: Vec<Weekday>,
}

impl WeekdayPattern {
    pub const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Hand-picked spreads for light schedules, keyed by sessions per week.
    fn fixed(sessions_per_week: u32) -> Option<&'static [u32]> {
        match sessions_per_week {
            1 => Some(&[2]),
            2 => Some(&[1, 4]),
            3 => Some(&[0, 3, 5]),
            4 => Some(&[0, 2, 4, 6]),
            _ => None,
        }
    }

    /// Derive the pattern for a sessions-per-week count.
    ///
    /// Counts 1-4 use a fixed spread. Larger counts sample the week with a
    /// stride of `7 / n` (at least 1) and keep the first `n` slots, so any
    /// count above seven saturates at every day of the week.
    pub fn for_sessions_per_week(sessions_per_week: u32) -> Self {
        let indices: Vec<u32> = match Self::fixed(sessions_per_week) {
            Some(indices) => indices.to_vec(),
            None => {
                let stride = (7 / sessions_per_week.max(1)).max(1);
                (0..7)
                    .step_by(stride as usize)
                    .take(sessions_per_week as usize)
                    .collect()
            }
        };
        let weekdays = indices
            .into_iter()
            .map(|idx| Self::ALL_WEEKDAYS[idx as usize])
            .collect();
        Self { weekdays }
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    /// Weekday indices with 0 = Monday.
    pub fn indices(&self) -> Vec<u32> {
        self.weekdays
            .iter()
            .map(|wd| wd.num_days_from_monday())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.weekdays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weekdays.is_empty()
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }
}

/// Monday on or before `date`, `None` at the start of the calendar range.
pub fn week_anchor(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

/// Find the nth occurrence of a weekday in a month
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let date = first.checked_add_days(Days::new(u64::from(offset + 7 * n.checked_sub(1)?)))?;
    (date.month() == month).then_some(date)
}

/// Find the last occurrence of a weekday in a month
pub fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut date = next_month.pred_opt()?; // Last day of the month
    while date.weekday() != weekday {
        date = date.pred_opt()?;
    }
    Some(date)
}
