use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;
use thiserror::Error;

const DAY_MS: i64 = 24 * 3600 * 1000;
const WEEK_MS: i64 = 7 * DAY_MS;

/// Weekday assumed when a week code has no `.<weekday>` part (Friday, the last work day).
pub const DEFAULT_WEEKDAY: u32 = 5;

static DAY_MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<day>\d+)/(?P<month>\d+)").unwrap());

/// Leading digits of each part; anything after them is ignored.
static WEEK_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CW\s*(?P<week>\d+)(?:\.(?P<weekday>\d+))?").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("deadline text is empty")]
    Empty,
    #[error("invalid week number in {0:?}")]
    InvalidWeek(String),
    #[error("invalid weekday in {0:?}")]
    InvalidWeekday(String),
    #[error("no calendar date {day}/{month} in {year}")]
    InvalidDate { day: u32, month: u32, year: i32 },
    #[error("unrecognized deadline {0:?}")]
    Unrecognized(String),
}

/// The "no real deadline" sentinel returned by the silent parsers.
pub fn epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

pub fn is_epoch(date: NaiveDateTime) -> bool {
    date == epoch()
}

/// Wall-clock "now" in local time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// The day week numbering counts from.
///
/// January 1 when it is a Monday, otherwise January 1 plus
/// `(7 - weekday) % 7` days, with Sunday = 0.
pub fn week_anchor(year: i32) -> NaiveDate {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let weekday = jan1.weekday().num_days_from_sunday();
    let offset = if weekday == 1 { 0 } else { (7 - weekday) % 7 };
    jan1 + Duration::days(offset as i64)
}

/// Week number as shown in week codes.
///
/// Instants before the anchor fall into week 52 of the previous year (no
/// cross-year lookup), the anchor instant itself is week 1, later instants
/// count started weeks. Every path then adds one, which existing week codes
/// rely on.
pub fn week_number_of(date: NaiveDateTime) -> u32 {
    let anchor = week_anchor(date.year()).and_time(NaiveTime::MIN);
    let week = match date.cmp(&anchor) {
        Ordering::Less => 52,
        Ordering::Equal => 1,
        Ordering::Greater => {
            let elapsed = (date - anchor).num_milliseconds();
            ((elapsed + WEEK_MS - 1) / WEEK_MS) as u32
        }
    };
    week + 1
}

/// Format `date` as `CW<week>.<weekday>`, weekday 0 = Sunday.
pub fn code_from_date(date: NaiveDateTime) -> String {
    format!(
        "CW{}.{}",
        week_number_of(date),
        date.weekday().num_days_from_sunday()
    )
}

/// Started days from `now` until `date`; negative when `date` lies in the past.
pub fn days_diff_from(date: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let ms = (date - now).num_milliseconds();
    let days = ms.div_euclid(DAY_MS);
    if ms.rem_euclid(DAY_MS) == 0 {
        days
    } else {
        days + 1
    }
}

pub fn days_diff(date: NaiveDateTime) -> i64 {
    days_diff_from(date, now())
}

/// True when `text` looks like a week code or a day/month date.
pub fn is_deadline_syntax(text: &str) -> bool {
    text.starts_with("CW") || DAY_MONTH_RE.is_match(text)
}

/// Parse a deadline relative to the current moment, returning [`epoch`] for
/// anything that cannot be read.
pub fn parse_deadline(text: &str) -> NaiveDateTime {
    parse_deadline_at(text, now())
}

pub fn parse_deadline_at(text: &str, now: NaiveDateTime) -> NaiveDateTime {
    match try_parse_deadline_at(text, now) {
        Ok(date) => date,
        Err(e) => {
            log::debug!("Unparseable deadline: {}", e);
            epoch()
        }
    }
}

/// Parse `CW<week>[.<weekday>]` or `<day>/<month>` in `now`'s year.
///
/// The result carries `now`'s time of day. Week codes resolve to the day of
/// that week with the requested weekday, the inverse of [`code_from_date`].
/// Only the leading digits of the week and weekday count, so `CW5.3 noon`
/// reads as `CW5.3`. A day/month pair that is not a real calendar date
/// (`31/2`, `1/13`) is an error; it does not roll over into the next month.
pub fn try_parse_deadline_at(text: &str, now: NaiveDateTime) -> Result<NaiveDateTime, ScheduleError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ScheduleError::Empty);
    }

    if text.starts_with("CW") {
        let caps = WEEK_CODE_RE
            .captures(text)
            .ok_or_else(|| ScheduleError::InvalidWeek(text.to_string()))?;
        let week: u32 = caps["week"]
            .parse()
            .ok()
            .filter(|w| (1..=54).contains(w))
            .ok_or_else(|| ScheduleError::InvalidWeek(text.to_string()))?;
        let weekday = match caps.name("weekday") {
            Some(day) => day
                .as_str()
                .parse::<u32>()
                .ok()
                .filter(|d| *d <= 6)
                .ok_or_else(|| ScheduleError::InvalidWeekday(text.to_string()))?,
            None => DEFAULT_WEEKDAY,
        };

        let anchor = week_anchor(now.year());
        let anchor_weekday = anchor.weekday().num_days_from_sunday();
        let offset = (weekday + 7 - anchor_weekday) % 7;
        let day = anchor + Duration::days((week as i64 - 2) * 7 + offset as i64);
        return Ok(day.and_time(now.time()));
    }

    if let Some(caps) = DAY_MONTH_RE.captures(text) {
        let (Ok(day), Ok(month)) = (caps["day"].parse::<u32>(), caps["month"].parse::<u32>()) else {
            return Err(ScheduleError::Unrecognized(text.to_string()));
        };
        let year = now.year();
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(ScheduleError::InvalidDate { day, month, year })?;
        return Ok(date.and_time(now.time()));
    }

    Err(ScheduleError::Unrecognized(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn anchor_follows_jan_first_formula() {
        // 2024-01-01 is a Monday
        assert_eq!(week_anchor(2024), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        // 2026-01-01 is a Thursday: (7 - 4) % 7 = 3
        assert_eq!(week_anchor(2026), NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
        // 2023-01-01 is a Sunday: (7 - 0) % 7 = 0
        assert_eq!(week_anchor(2023), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn week_numbers_keep_the_offset() {
        assert_eq!(week_number_of(at(2024, 1, 1, 0)), 2);
        assert_eq!(week_number_of(at(2024, 1, 1, 10)), 2);
        assert_eq!(week_number_of(at(2024, 1, 8, 10)), 3);
        // before the anchor
        assert_eq!(week_number_of(at(2026, 1, 2, 10)), 53);
        assert_eq!(week_number_of(at(2026, 10, 16, 10)), 42);
    }

    #[test]
    fn code_uses_sunday_based_weekday() {
        // 2026-10-16 is a Friday
        assert_eq!(code_from_date(at(2026, 10, 16, 10)), "CW42.5");
        // 2026-10-18 is a Sunday
        assert_eq!(code_from_date(at(2026, 10, 18, 10)), "CW43.0");
    }

    #[test]
    fn week_code_round_trips_components() {
        for year in [2024, 2026] {
            let now = at(year, 6, 1, 9);
            let mut day = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            while day.year() == year {
                let instant = day.and_hms_opt(10, 30, 0).unwrap();
                let code = code_from_date(instant);
                let parsed = parse_deadline_at(&code, now);
                assert_eq!(code_from_date(parsed), code, "round trip of {}", instant);
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn week_code_defaults_to_friday() {
        let now = at(2026, 10, 16, 10);
        let parsed = parse_deadline_at("CW42", now);
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(parsed.time(), now.time());
    }

    #[test]
    fn week_code_ignores_trailing_text() {
        let now = at(2026, 10, 16, 10);
        let plain = parse_deadline_at("CW5.3", now);
        assert!(!is_epoch(plain));
        assert_eq!(parse_deadline_at("CW5.3 noon", now), plain);
        assert_eq!(parse_deadline_at("CW5.3.1", now), plain);
        assert_eq!(parse_deadline_at("CW 5.3", now), plain);
        assert_eq!(parse_deadline_at("CW42 or so", now), parse_deadline_at("CW42", now));
    }

    #[test]
    fn invalid_day_month_does_not_roll_over() {
        let now = at(2026, 10, 16, 10);
        assert_eq!(
            try_parse_deadline_at("1/13", now),
            Err(ScheduleError::InvalidDate { day: 1, month: 13, year: 2026 })
        );
        assert!(is_epoch(parse_deadline_at("31/2", now)));
    }

    #[test]
    fn day_month_uses_current_year_and_time() {
        let now = at(2026, 10, 16, 10);
        let parsed = parse_deadline_at("3/12", now);
        assert_eq!(parsed, at(2026, 12, 3, 10));
    }

    #[test]
    fn bad_text_yields_sentinel() {
        let now = at(2026, 10, 16, 10);
        assert!(is_epoch(parse_deadline_at("not-a-date", now)));
        assert!(is_epoch(parse_deadline_at("03/25", now)));
        assert!(is_epoch(parse_deadline_at("CWx.2", now)));
        assert!(days_diff_from(epoch(), now) < -20000);
    }

    #[test]
    fn explicit_errors_name_the_problem() {
        let now = at(2026, 10, 16, 10);
        assert_eq!(try_parse_deadline_at("", now), Err(ScheduleError::Empty));
        assert_eq!(
            try_parse_deadline_at("CW5.9", now),
            Err(ScheduleError::InvalidWeekday("CW5.9".into()))
        );
        assert_eq!(
            try_parse_deadline_at("31/2", now),
            Err(ScheduleError::InvalidDate { day: 31, month: 2, year: 2026 })
        );
        assert!(matches!(
            try_parse_deadline_at("soon", now),
            Err(ScheduleError::Unrecognized(_))
        ));
    }

    #[test]
    fn days_diff_rounds_up_started_days() {
        let now = at(2026, 10, 16, 10);
        assert_eq!(days_diff_from(now, now), 0);
        assert_eq!(days_diff_from(now - Duration::milliseconds(5), now), 0);
        assert_eq!(days_diff_from(at(2026, 10, 17, 10), now), 1);
        assert_eq!(days_diff_from(at(2026, 10, 17, 9), now), 1);
        assert_eq!(days_diff_from(at(2026, 10, 14, 10), now), -2);
        assert_eq!(days_diff_from(at(2026, 10, 14, 12), now), -1);
    }

    #[test]
    fn deadline_syntax_detection() {
        assert!(is_deadline_syntax("CW5.3"));
        assert!(is_deadline_syntax("03/25"));
        assert!(!is_deadline_syntax("not-a-date"));
        assert!(!is_deadline_syntax("cw5"));
    }
}
