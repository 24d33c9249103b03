//! Cron Schedule - five-field cron expressions evaluated in a fixed timezone
//!
//! Field order: `minute hour day-of-month month day-of-week`.
//!
//! Supported syntax per field: `*`, `?` (day fields), single values, ranges
//! `a-b`, steps `*/n`, `a-b/n`, `a/n`, and comma lists. Months accept
//! `JAN`-`DEC`, weekdays accept `SUN`-`SAT`; weekday `0` and `7` are both
//! Sunday. The descriptors `@yearly`, `@annually`, `@monthly`, `@weekly`,
//! `@daily`, `@midnight` and `@hourly` are expanded before parsing.
//! `@every <duration>` (Go duration syntax, e.g. `@every 24h`, `@every 1h30m`)
//! fires at a constant interval instead, rounded down to whole seconds with a
//! one second minimum.
//!
//! Day rule: a day field counts as unrestricted only when it is a bare `*` or
//! `?` (optionally `/1`). A stepped star such as `*/2` is restricted, so
//! combined with a restricted weekday either field is enough to match.
//!
//! DST handling:
//! - Spring-forward gaps: local times that don't exist are skipped.
//! - Fall-back overlaps: the earliest (pre-transition) mapping is chosen.

use super::error::ScheduleError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::fmt;

/// 07:00 every day
pub const DEFAULT_CRON_EXPRESSION: &str = "0 7 * * *";

/// Timezone the schedule is evaluated in unless configured otherwise
pub const DEFAULT_TIMEZONE: &str = "Asia/Muscat";

/// How far ahead `next_after` searches before giving up (covers Feb 29)
const SEARCH_HORIZON_DAYS: i64 = 366 * 5;

const MONTH_NAMES: &[&str] = &[
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const WEEKDAY_NAMES: &[&str] = &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Static description of one cron field
struct FieldBounds {
    name: &'static str,
    min: u32,
    max: u32,
    /// Names mapped to `min + index`
    names: &'static [&'static str],
    allow_question_mark: bool,
}

const MINUTE: FieldBounds = FieldBounds {
    name: "minute",
    min: 0,
    max: 59,
    names: &[],
    allow_question_mark: false,
};
const HOUR: FieldBounds = FieldBounds {
    name: "hour",
    min: 0,
    max: 23,
    names: &[],
    allow_question_mark: false,
};
const DAY_OF_MONTH: FieldBounds = FieldBounds {
    name: "day-of-month",
    min: 1,
    max: 31,
    names: &[],
    allow_question_mark: true,
};
const MONTH: FieldBounds = FieldBounds {
    name: "month",
    min: 1,
    max: 12,
    names: MONTH_NAMES,
    allow_question_mark: false,
};
// 7 is accepted on input and folded onto Sunday (0)
const DAY_OF_WEEK: FieldBounds = FieldBounds {
    name: "day-of-week",
    min: 0,
    max: 7,
    names: WEEKDAY_NAMES,
    allow_question_mark: true,
};

/// Set of allowed values for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldSet {
    bits: u64,
    /// Some list element was a bare `*`/`?` with no step above 1
    unrestricted: bool,
}

impl FieldSet {
    fn contains(&self, value: u32) -> bool {
        value < 64 && self.bits & (1u64 << value) != 0
    }
}

/// Matching calendar fields of a five-field expression
#[derive(Debug, Clone, PartialEq, Eq)]
struct Calendar {
    minutes: FieldSet,
    hours: FieldSet,
    days_of_month: FieldSet,
    months: FieldSet,
    days_of_week: FieldSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    Calendar(Calendar),
    /// `@every`: whole seconds, at least one
    Every(Duration),
}

/// A parsed cron expression bound to a timezone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    expression: String,
    timezone: Tz,
    rule: Rule,
}

impl CronSchedule {
    /// Parse `expression` and resolve `timezone` as an IANA name
    ///
    /// # Errors
    /// - `ScheduleError::UnknownTimezone` for names chrono-tz does not know
    /// - `ScheduleError::InvalidExpression` / `InvalidField` for malformed input
    ///   (including an unparsable `@every` duration)
    /// - `ScheduleError::NeverFires` for dates that cannot exist (e.g. Feb 30)
    pub fn parse(expression: &str, timezone: &str) -> Result<Self, ScheduleError> {
        let tz = timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| ScheduleError::UnknownTimezone(timezone.to_string()))?;
        Self::with_timezone(expression, tz)
    }

    /// Parse `expression` for an already-resolved timezone
    pub fn with_timezone(expression: &str, timezone: Tz) -> Result<Self, ScheduleError> {
        let trimmed = expression.trim();

        if let Some(interval) = every_interval(trimmed)? {
            return Ok(Self {
                expression: trimmed.to_string(),
                timezone,
                rule: Rule::Every(interval),
            });
        }

        let expanded = expand_descriptor(trimmed)?;

        let fields: Vec<&str> = expanded.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ScheduleError::InvalidExpression {
                expression: trimmed.to_string(),
                reason: format!("expected 5 fields, got {}", fields.len()),
            });
        }

        let mut days_of_week = parse_field(&DAY_OF_WEEK, fields[4])?;
        if days_of_week.contains(7) {
            days_of_week.bits = (days_of_week.bits & !(1u64 << 7)) | 1;
        }

        let calendar = Calendar {
            minutes: parse_field(&MINUTE, fields[0])?,
            hours: parse_field(&HOUR, fields[1])?,
            days_of_month: parse_field(&DAY_OF_MONTH, fields[2])?,
            months: parse_field(&MONTH, fields[3])?,
            days_of_week,
        };

        if !calendar.has_reachable_day() {
            return Err(ScheduleError::NeverFires(trimmed.to_string()));
        }

        Ok(Self {
            expression: trimmed.to_string(),
            timezone,
            rule: Rule::Calendar(calendar),
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// First fire instant strictly after `after`
    ///
    /// Returns `None` only if nothing matches within the search horizon,
    /// which `parse` already rules out for valid expressions.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match &self.rule {
            Rule::Calendar(calendar) => calendar.next_after(after, self.timezone),
            Rule::Every(interval) => after.with_nanosecond(0)?.checked_add_signed(*interval),
        }
    }

    /// Up to `n` consecutive fire instants after `after`
    pub fn upcoming(&self, after: DateTime<Utc>, n: usize) -> Vec<DateTime<Utc>> {
        let mut results = Vec::with_capacity(n);
        let mut cursor = after;
        for _ in 0..n {
            match self.next_after(cursor) {
                Some(next) => {
                    results.push(next);
                    cursor = next;
                }
                None => break,
            }
        }
        results
    }
}

impl Calendar {
    fn next_after(&self, after: DateTime<Utc>, timezone: Tz) -> Option<DateTime<Utc>> {
        let local_after = after.with_timezone(&timezone).naive_local();
        let mut candidate = local_after
            .date()
            .and_hms_opt(local_after.hour(), local_after.minute(), 0)?
            + Duration::minutes(1);
        let horizon = candidate + Duration::days(SEARCH_HORIZON_DAYS);

        while candidate <= horizon {
            if !self.months.contains(candidate.month()) {
                candidate = first_of_next_month(candidate)?;
                continue;
            }
            if !self.day_matches(candidate.date()) {
                candidate = candidate.date().succ_opt()?.and_hms_opt(0, 0, 0)?;
                continue;
            }
            if !self.hours.contains(candidate.hour()) {
                candidate = candidate.date().and_hms_opt(candidate.hour(), 0, 0)?
                    + Duration::hours(1);
                continue;
            }
            if self.minutes.contains(candidate.minute()) {
                let resolved = match timezone.from_local_datetime(&candidate) {
                    chrono::LocalResult::Single(dt) => Some(dt),
                    chrono::LocalResult::Ambiguous(earliest, _) => Some(earliest),
                    // DST gap: this local minute doesn't exist
                    chrono::LocalResult::None => None,
                };
                if let Some(dt) = resolved {
                    let utc = dt.with_timezone(&Utc);
                    if utc > after {
                        return Some(utc);
                    }
                }
            }
            candidate += Duration::minutes(1);
        }
        None
    }

    /// Cron day rule: if either day field is unrestricted both must match,
    /// otherwise either one is enough.
    fn day_matches(&self, date: NaiveDate) -> bool {
        let dom = self.days_of_month.contains(date.day());
        let dow = self
            .days_of_week
            .contains(date.weekday().num_days_from_sunday());
        if self.days_of_month.unrestricted || self.days_of_week.unrestricted {
            dom && dow
        } else {
            dom || dow
        }
    }

    /// Rejects combinations like `0 0 30 2 *` that no calendar can satisfy
    fn has_reachable_day(&self) -> bool {
        if self.days_of_month.unrestricted || !self.days_of_week.unrestricted {
            return true;
        }
        (1..=12u32)
            .filter(|m| self.months.contains(*m))
            .any(|m| (1..=max_days_in_month(m)).any(|d| self.days_of_month.contains(d)))
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.expression, self.timezone.name())
    }
}

/// `Some(interval)` for an `@every <duration>` expression
fn every_interval(expression: &str) -> Result<Option<Duration>, ScheduleError> {
    let Some((keyword, rest)) = expression.split_once(char::is_whitespace) else {
        return Ok(None);
    };
    if !keyword.eq_ignore_ascii_case("@every") {
        return Ok(None);
    }

    let invalid = |reason: &str| ScheduleError::InvalidExpression {
        expression: expression.to_string(),
        reason: reason.to_string(),
    };

    let seconds = parse_duration_secs(rest.trim()).ok_or_else(|| invalid("bad @every duration"))?;
    // Anything beyond the search horizon is treated as a typo
    if seconds > (SEARCH_HORIZON_DAYS * 86_400) as f64 {
        return Err(invalid("@every interval too long"));
    }
    let whole = (seconds.floor() as i64).max(1);
    Ok(Some(Duration::seconds(whole)))
}

/// Go-style duration (`90s`, `1h30m`, `1.5h`, `250ms`) in seconds
fn parse_duration_secs(text: &str) -> Option<f64> {
    if text == "0" {
        return Some(0.0);
    }
    if text.is_empty() {
        return None;
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let mut rest = text;
    let mut total = 0.0;
    while !rest.is_empty() {
        let split = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        let (number, tail) = rest.split_at(split);
        let value: f64 = number.parse().ok()?;

        let split = tail.find(is_number).unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(split);
        let scale = match unit {
            "ns" => 1e-9,
            "us" | "µs" | "μs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return None,
        };

        total += value * scale;
        rest = tail;
    }
    Some(total)
}

fn expand_descriptor(expression: &str) -> Result<String, ScheduleError> {
    if !expression.starts_with('@') {
        return Ok(expression.to_string());
    }
    let expanded = match expression.to_ascii_lowercase().as_str() {
        "@yearly" | "@annually" => "0 0 1 1 *",
        "@monthly" => "0 0 1 * *",
        "@weekly" => "0 0 * * 0",
        "@daily" | "@midnight" => "0 0 * * *",
        "@hourly" => "0 * * * *",
        _ => {
            return Err(ScheduleError::InvalidExpression {
                expression: expression.to_string(),
                reason: "unknown descriptor".to_string(),
            })
        }
    };
    Ok(expanded.to_string())
}

fn parse_field(bounds: &FieldBounds, text: &str) -> Result<FieldSet, ScheduleError> {
    let invalid = |reason: String| ScheduleError::InvalidField {
        field: bounds.name,
        value: text.to_string(),
        reason,
    };

    let mut set = FieldSet {
        bits: 0,
        unrestricted: false,
    };

    for part in text.split(',') {
        if part.is_empty() {
            return Err(invalid("empty list element".to_string()));
        }

        let (range, step) = match part.split_once('/') {
            Some((range, step)) => {
                let step: u32 = step
                    .parse()
                    .map_err(|_| invalid(format!("bad step '{}'", step)))?;
                if step == 0 {
                    return Err(invalid("step must be positive".to_string()));
                }
                (range, Some(step))
            }
            None => (part, None),
        };

        let (start, end) = if range == "*" || range == "?" {
            if range == "?" && !bounds.allow_question_mark {
                return Err(invalid("'?' is only allowed in day fields".to_string()));
            }
            // `*/2` selects a subset, so it restricts the field
            if step.unwrap_or(1) == 1 {
                set.unrestricted = true;
            }
            (bounds.min, bounds.max)
        } else if let Some((lo, hi)) = range.split_once('-') {
            (parse_value(bounds, lo)?, parse_value(bounds, hi)?)
        } else {
            let value = parse_value(bounds, range)?;
            // `a/n` means "from a to the end of the field, every n"
            match step {
                Some(_) => (value, bounds.max),
                None => (value, value),
            }
        };

        if start > end {
            return Err(invalid(format!("range {}-{} is reversed", start, end)));
        }

        let step = step.unwrap_or(1) as usize;
        for value in (start..=end).step_by(step) {
            set.bits |= 1u64 << value;
        }
    }

    Ok(set)
}

fn parse_value(bounds: &FieldBounds, text: &str) -> Result<u32, ScheduleError> {
    let value = match text.parse::<u32>() {
        Ok(n) => n,
        Err(_) => bounds
            .names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(text))
            .map(|index| bounds.min + index as u32)
            .ok_or_else(|| ScheduleError::InvalidField {
                field: bounds.name,
                value: text.to_string(),
                reason: "not a number or known name".to_string(),
            })?,
    };

    if value < bounds.min || value > bounds.max {
        return Err(ScheduleError::InvalidField {
            field: bounds.name,
            value: text.to_string(),
            reason: format!("out of range {}-{}", bounds.min, bounds.max),
        });
    }
    Ok(value)
}

fn first_of_next_month(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    let (year, month) = if dt.month() == 12 {
        (dt.year() + 1, 1)
    } else {
        (dt.year(), dt.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}

fn max_days_in_month(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_default_schedule_in_muscat() {
        let schedule = CronSchedule::parse(DEFAULT_CRON_EXPRESSION, DEFAULT_TIMEZONE).unwrap();

        // 07:00 Muscat is 03:00 UTC (fixed +04:00, no DST)
        let next = schedule.next_after(utc(2024, 6, 15, 1, 0)).unwrap();
        assert_eq!(next, utc(2024, 6, 15, 3, 0));

        // Already past today's fire: tomorrow
        let next = schedule.next_after(utc(2024, 6, 15, 3, 0)).unwrap();
        assert_eq!(next, utc(2024, 6, 16, 3, 0));
    }

    #[test]
    fn test_every_fifteen_minutes() {
        let schedule = CronSchedule::parse("*/15 * * * *", "UTC").unwrap();
        let fires = schedule.upcoming(utc(2024, 6, 15, 10, 7), 3);
        assert_eq!(
            fires,
            vec![
                utc(2024, 6, 15, 10, 15),
                utc(2024, 6, 15, 10, 30),
                utc(2024, 6, 15, 10, 45)
            ]
        );
    }

    #[test]
    fn test_seconds_are_truncated() {
        let schedule = CronSchedule::parse("* * * * *", "UTC").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 59).unwrap();
        assert_eq!(schedule.next_after(after), Some(utc(2024, 6, 15, 10, 1)));
    }

    #[test]
    fn test_ranges_lists_and_names() {
        // Weekdays at 09:30 and 17:30
        let schedule = CronSchedule::parse("30 9,17 * * MON-FRI", "UTC").unwrap();

        // 2024-06-15 is a Saturday: next fire is Monday 09:30
        let next = schedule.next_after(utc(2024, 6, 15, 12, 0)).unwrap();
        assert_eq!(next, utc(2024, 6, 17, 9, 30));

        let next = schedule.next_after(next).unwrap();
        assert_eq!(next, utc(2024, 6, 17, 17, 30));
    }

    #[test]
    fn test_month_names_and_year_rollover() {
        let schedule = CronSchedule::parse("0 0 1 jan *", "UTC").unwrap();
        let next = schedule.next_after(utc(2024, 6, 15, 0, 0)).unwrap();
        assert_eq!(next, utc(2025, 1, 1, 0, 0));
    }

    #[test]
    fn test_sunday_as_seven() {
        let zero = CronSchedule::parse("0 8 * * 0", "UTC").unwrap();
        let seven = CronSchedule::parse("0 8 * * 7", "UTC").unwrap();
        let after = utc(2024, 6, 12, 0, 0); // Wednesday
        assert_eq!(zero.next_after(after), seven.next_after(after));
        assert_eq!(seven.next_after(after), Some(utc(2024, 6, 16, 8, 0)));
    }

    #[test]
    fn test_day_of_month_or_day_of_week() {
        // Both day fields restricted: the 1st of the month OR any Friday
        let schedule = CronSchedule::parse("0 12 1 * 5", "UTC").unwrap();
        let fires = schedule.upcoming(utc(2024, 6, 25, 0, 0), 3);
        assert_eq!(
            fires,
            vec![
                utc(2024, 6, 28, 12, 0), // Friday
                utc(2024, 7, 1, 12, 0),  // the 1st (a Monday)
                utc(2024, 7, 5, 12, 0),  // Friday
            ]
        );
    }

    #[test]
    fn test_stepped_day_of_month_is_restricted() {
        // Odd days of the month OR Tuesdays
        let schedule = CronSchedule::parse("0 7 */2 * 2", "UTC").unwrap();
        let fires = schedule.upcoming(utc(2024, 6, 1, 8, 0), 3);
        assert_eq!(
            fires,
            vec![
                utc(2024, 6, 3, 7, 0),
                utc(2024, 6, 4, 7, 0), // Tuesday
                utc(2024, 6, 5, 7, 0),
            ]
        );

        // `*/1` is still a plain star: only Tuesdays
        let schedule = CronSchedule::parse("0 7 */1 * 2", "UTC").unwrap();
        assert_eq!(
            schedule.next_after(utc(2024, 6, 1, 8, 0)),
            Some(utc(2024, 6, 4, 7, 0))
        );
    }

    #[test]
    fn test_stepped_weekday_with_star_day_of_month() {
        // Day-of-month unrestricted: the weekday step alone decides
        let schedule = CronSchedule::parse("0 7 * * */3", "UTC").unwrap();
        // 2024-06-01 is a Saturday; */3 means Sun, Wed, Sat
        let fires = schedule.upcoming(utc(2024, 6, 1, 8, 0), 2);
        assert_eq!(fires, vec![utc(2024, 6, 2, 7, 0), utc(2024, 6, 5, 7, 0)]);
    }

    #[test]
    fn test_every_interval() {
        let schedule = CronSchedule::parse("@every 24h", "Asia/Muscat").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 15, 10, 20, 30).unwrap();
        assert_eq!(
            schedule.next_after(after),
            Some(Utc.with_ymd_and_hms(2024, 6, 16, 10, 20, 30).unwrap())
        );
        assert_eq!(schedule.to_string(), "@every 24h (Asia/Muscat)");

        let mixed = CronSchedule::parse("@every 1h30m", "UTC").unwrap();
        assert_eq!(
            mixed.upcoming(utc(2024, 6, 15, 10, 0), 2),
            vec![utc(2024, 6, 15, 11, 30), utc(2024, 6, 15, 13, 0)]
        );

        // Sub-second parts are dropped, with a one second floor
        let tiny = CronSchedule::parse("@every 250ms", "UTC").unwrap();
        let after = utc(2024, 6, 15, 10, 0) + Duration::milliseconds(400);
        assert_eq!(
            tiny.next_after(after),
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 1).unwrap())
        );
    }

    #[test]
    fn test_every_rejects_bad_durations() {
        for expression in ["@every", "@every 10", "@every 5x", "@every -1h", "@every h"] {
            assert!(
                matches!(
                    CronSchedule::parse(expression, "UTC"),
                    Err(ScheduleError::InvalidExpression { .. })
                ),
                "expected '{}' to be rejected",
                expression
            );
        }
    }

    #[test]
    fn test_step_from_start_value() {
        let schedule = CronSchedule::parse("5/20 * * * *", "UTC").unwrap();
        let fires = schedule.upcoming(utc(2024, 6, 15, 10, 0), 4);
        assert_eq!(
            fires,
            vec![
                utc(2024, 6, 15, 10, 5),
                utc(2024, 6, 15, 10, 25),
                utc(2024, 6, 15, 10, 45),
                utc(2024, 6, 15, 11, 5),
            ]
        );
    }

    #[test]
    fn test_descriptors() {
        let daily = CronSchedule::parse("@daily", "UTC").unwrap();
        assert_eq!(
            daily.next_after(utc(2024, 6, 15, 10, 0)),
            Some(utc(2024, 6, 16, 0, 0))
        );
        assert_eq!(daily.expression(), "@daily");

        let hourly = CronSchedule::parse("@HOURLY", "UTC").unwrap();
        assert_eq!(
            hourly.next_after(utc(2024, 6, 15, 10, 0)),
            Some(utc(2024, 6, 15, 11, 0))
        );

        assert!(matches!(
            CronSchedule::parse("@fortnightly", "UTC"),
            Err(ScheduleError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_leap_day() {
        let schedule = CronSchedule::parse("0 0 29 2 *", "UTC").unwrap();
        let next = schedule.next_after(utc(2025, 3, 1, 0, 0)).unwrap();
        assert_eq!(next, utc(2028, 2, 29, 0, 0));
    }

    #[test]
    fn test_spring_forward_gap_is_skipped() {
        // 2024-03-10 02:30 does not exist in New York
        let schedule = CronSchedule::parse("30 2 * * *", "America/New_York").unwrap();
        let next = schedule.next_after(utc(2024, 3, 10, 6, 0)).unwrap();
        // 2024-03-11 02:30 EDT = 06:30 UTC
        assert_eq!(next, utc(2024, 3, 11, 6, 30));
    }

    #[test]
    fn test_fall_back_overlap_uses_earliest() {
        // 2024-11-03 01:30 happens twice in New York
        let schedule = CronSchedule::parse("30 1 * * *", "America/New_York").unwrap();
        let next = schedule.next_after(utc(2024, 11, 3, 4, 0)).unwrap();
        // First occurrence is 01:30 EDT = 05:30 UTC
        assert_eq!(next, utc(2024, 11, 3, 5, 30));

        // The repeated 01:30 EST does not fire a second time
        let after_first = schedule.next_after(next).unwrap();
        assert_eq!(after_first, utc(2024, 11, 4, 6, 30));
    }

    #[test]
    fn test_invalid_expressions() {
        let cases = [
            "0 7 * *",         // too few fields
            "0 0 7 * * *",     // seconds field not supported
            "60 * * * *",      // minute out of range
            "0 24 * * *",      // hour out of range
            "0 0 0 * *",       // day-of-month starts at 1
            "0 0 * 13 *",      // month out of range
            "0 0 * * 8",       // weekday out of range
            "*/0 * * * *",     // zero step
            "10-5 * * * *",    // reversed range
            "0 0 * * FUNDAY",  // unknown name
            "0,,5 * * * *",    // empty list element
            "? * * * *",       // '?' outside day fields
        ];
        for expression in cases {
            assert!(
                CronSchedule::parse(expression, "UTC").is_err(),
                "expected '{}' to be rejected",
                expression
            );
        }
    }

    #[test]
    fn test_never_firing_expression_rejected() {
        assert_eq!(
            CronSchedule::parse("0 0 30 2 *", "UTC"),
            Err(ScheduleError::NeverFires("0 0 30 2 *".to_string()))
        );
        // Restricting the weekday as well makes it fire on Mondays
        assert!(CronSchedule::parse("0 0 30 2 1", "UTC").is_ok());
    }

    #[test]
    fn test_unknown_timezone() {
        assert_eq!(
            CronSchedule::parse("0 7 * * *", "Not/AZone"),
            Err(ScheduleError::UnknownTimezone("Not/AZone".to_string()))
        );
    }

    #[test]
    fn test_display() {
        let schedule = CronSchedule::parse("0 7 * * *", "Asia/Muscat").unwrap();
        assert_eq!(schedule.to_string(), "0 7 * * * (Asia/Muscat)");
    }
}
