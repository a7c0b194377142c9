use chrono::{NaiveDate, Weekday};
use crochet_planner::calendar::{WeekdayPattern, last_weekday, nth_weekday, week_anchor};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn fixed_patterns_for_light_weeks() {
    assert_eq!(WeekdayPattern::for_sessions_per_week(1).indices(), vec![2]);
    assert_eq!(WeekdayPattern::for_sessions_per_week(2).indices(), vec![1, 4]);
    assert_eq!(
        WeekdayPattern::for_sessions_per_week(3).weekdays(),
        &[Weekday::Mon, Weekday::Thu, Weekday::Sat]
    );
    assert_eq!(
        WeekdayPattern::for_sessions_per_week(4).indices(),
        vec![0, 2, 4, 6]
    );
}

#[test]
fn stride_patterns_for_five_or_more() {
    assert_eq!(
        WeekdayPattern::for_sessions_per_week(5).indices(),
        vec![0, 1, 2, 3, 4]
    );
    assert_eq!(
        WeekdayPattern::for_sessions_per_week(6).indices(),
        vec![0, 1, 2, 3, 4, 5]
    );
    let daily = WeekdayPattern::for_sessions_per_week(7);
    assert_eq!(daily.weekdays(), &WeekdayPattern::ALL_WEEKDAYS);
}

#[test]
fn counts_above_seven_cover_each_weekday_once() {
    for spw in 8..=14 {
        let pattern = WeekdayPattern::for_sessions_per_week(spw);
        assert_eq!(pattern.len(), 7, "spw={spw}");
        assert!(pattern.contains(Weekday::Sun));
    }
}

#[test]
fn week_anchor_is_monday_on_or_before() {
    assert_eq!(week_anchor(d(2024, 1, 1)), Some(d(2024, 1, 1)));
    assert_eq!(week_anchor(d(2024, 1, 7)), Some(d(2024, 1, 1)));
    assert_eq!(week_anchor(d(2024, 3, 1)), Some(d(2024, 2, 26)));
}

#[test]
fn nth_and_last_weekday_of_month() {
    assert_eq!(nth_weekday(2024, 3, Weekday::Sun, 2), Some(d(2024, 3, 10)));
    assert_eq!(nth_weekday(2024, 11, Weekday::Sun, 1), Some(d(2024, 11, 3)));
    assert_eq!(nth_weekday(1970, 3, Weekday::Sun, 2), Some(d(1970, 3, 8)));
    assert_eq!(nth_weekday(2024, 2, Weekday::Thu, 5), Some(d(2024, 2, 29)));
    assert_eq!(nth_weekday(2024, 2, Weekday::Fri, 5), None);
    assert_eq!(nth_weekday(2024, 2, Weekday::Fri, 0), None);
    assert_eq!(last_weekday(2024, 3, Weekday::Sun), Some(d(2024, 3, 31)));
    assert_eq!(last_weekday(2024, 10, Weekday::Sun), Some(d(2024, 10, 27)));
    assert_eq!(last_weekday(2024, 12, Weekday::Tue), Some(d(2024, 12, 31)));
}
