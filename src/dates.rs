//! Date normalization for feed articles.
//!
//! The feed is edited by hand and mixes several date spellings:
//! `2025/8/14`, `2025/08/14 9:30`, `2025-08-15 10:30`, `2025-08-15`, and
//! full RFC 3339 timestamps. Everything goes through [`DateNormalizer::parse`],
//! which yields one instant per article. The calendar key used for "today"
//! matching and the timestamp used for ordering both come from that instant,
//! so the two can never disagree.
//!
//! # Timezones
//!
//! The feed is authored in a fixed UTC offset (UTC+9 by default).
//! - Slash dates are wall-clock dates in that offset.
//! - Other dates without an explicit offset are read as UTC and shifted.
//!
//! The same clock time therefore lands differently depending on spelling:
//! `2025/08/15 20:00` is 20:00 at UTC+9 (key `2025/08/15`), while
//! `2025-08-15 20:00` is 20:00 UTC, i.e. 05:00 the next day at UTC+9
//! (key `2025/08/16`). Mixed-format rows written with the same clock time
//! sort 9 hours apart.

use crate::error::FeedError;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Naive date-time layouts tried for non-slash dates, most specific first.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Time layouts accepted after the day of a slash date.
const SLASH_TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Converts raw feed dates into comparable keys and instants.
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    offset: FixedOffset,
}

impl DateNormalizer {
    /// Create a normalizer for a feed authored at `utc_offset_hours`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidConfig`] if the offset is outside ±23 hours.
    pub fn new(utc_offset_hours: i32) -> Result<Self, FeedError> {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                FeedError::InvalidConfig(format!("UTC offset out of range: {utc_offset_hours}h"))
            })?;
        Ok(Self { offset })
    }

    /// Parse a raw feed date into an instant, or `None` if it is unparseable.
    pub fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.contains('/') {
            self.parse_slash(raw)
        } else {
            parse_generic(raw)
        }
    }

    /// Canonical `YYYY/MM/DD` key of a raw date in the feed's timezone.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let n = DateNormalizer::new(9)?;
    /// assert_eq!(n.normalize("2025/8/14").as_deref(), Some("2025/08/14"));
    /// ```
    pub fn normalize(&self, raw: &str) -> Option<String> {
        self.parse(raw).map(|instant| self.key_of(instant))
    }

    /// Today's key: `now` shifted into the feed's timezone.
    pub fn today_key(&self, now: DateTime<Utc>) -> String {
        self.key_of(now)
    }

    /// Short age label for display.
    ///
    /// - `今日` for today (and for dates in the future)
    /// - `昨日` for yesterday
    /// - `N日前` for 2 to 6 days ago
    /// - `M月D日` for anything older
    ///
    /// Unparseable dates are returned unchanged.
    pub fn relative_label(&self, raw: &str, now: DateTime<Utc>) -> String {
        let Some(instant) = self.parse(raw) else {
            return raw.trim().to_string();
        };
        let days = (now - instant).num_days();
        match days {
            d if d <= 0 => "今日".to_string(),
            1 => "昨日".to_string(),
            d if d < 7 => format!("{d}日前"),
            _ => {
                let local = instant.with_timezone(&self.offset);
                format!("{}月{}日", local.month(), local.day())
            }
        }
    }

    /// True if `raw` falls within the `days`-long window that ends at `now`.
    ///
    /// A window reaching past the earliest representable date has no lower bound.
    pub fn is_within(&self, raw: &str, now: DateTime<Utc>, days: i64) -> bool {
        let Some(instant) = self.parse(raw) else {
            return false;
        };
        let start = Duration::try_days(days).and_then(|span| now.checked_sub_signed(span));
        instant <= now && start.is_none_or(|start| instant >= start)
    }

    fn key_of(&self, instant: DateTime<Utc>) -> String {
        let local = instant.with_timezone(&self.offset).date_naive();
        format_key(local)
    }

    /// `Y/M/D[ time]`: wall-clock time in the feed's timezone.
    fn parse_slash(&self, raw: &str) -> Option<DateTime<Utc>> {
        let parts: Vec<&str> = raw.split('/').collect();
        if parts.len() < 3 {
            return None;
        }
        let year: i32 = parts[0].trim().parse().ok()?;
        let month: u32 = parts[1].trim().parse().ok()?;
        let mut day_and_time = parts[2].split_whitespace();
        let day: u32 = day_and_time.next()?.parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        // The key ignores the time entirely; it only refines ordering.
        let time = day_and_time
            .next()
            .and_then(|t| {
                SLASH_TIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveTime::parse_from_str(t, fmt).ok())
            })
            .unwrap_or(NaiveTime::MIN);

        self.offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|local| local.with_timezone(&Utc))
    }
}

/// Anything that is not a slash date. Values without an offset are UTC.
fn parse_generic(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

fn format_key(date: NaiveDate) -> String {
    format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jst() -> DateNormalizer {
        DateNormalizer::new(9).unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_slash_date_is_zero_padded() {
        assert_eq!(jst().normalize("2025/8/14").as_deref(), Some("2025/08/14"));
    }

    #[test]
    fn test_canonical_key_is_fixed_point() {
        let n = jst();
        assert_eq!(n.normalize("2025/08/14").as_deref(), Some("2025/08/14"));
        let once = n.normalize("2025/8/4").unwrap();
        assert_eq!(n.normalize(&once).as_deref(), Some(once.as_str()));
    }

    #[test]
    fn test_slash_date_drops_time_and_pads_year() {
        let n = jst();
        assert_eq!(n.normalize("2025/8/14 23:45").as_deref(), Some("2025/08/14"));
        assert_eq!(n.normalize(" 2025/8/14 9:05:00 ").as_deref(), Some("2025/08/14"));
        assert_eq!(n.normalize("25/1/2").as_deref(), Some("0025/01/02"));
    }

    #[test]
    fn test_slash_date_is_not_shifted() {
        // 23:00 in the feed's timezone stays on the same calendar day.
        assert_eq!(jst().normalize("2025/08/14 23:00").as_deref(), Some("2025/08/14"));
        assert_eq!(
            jst().parse("2025/08/14 23:00"),
            Some(utc("2025-08-14T14:00:00Z"))
        );
    }

    #[test]
    fn test_generic_dates_are_shifted_nine_hours() {
        let n = jst();
        assert_eq!(n.normalize("2025-08-15").as_deref(), Some("2025/08/15"));
        assert_eq!(n.normalize("2025-08-15 10:30").as_deref(), Some("2025/08/15"));
        // 16:00 UTC is 01:00 the next day at UTC+9.
        assert_eq!(n.normalize("2025-08-15 16:00").as_deref(), Some("2025/08/16"));
        assert_eq!(
            n.normalize("2025-08-15T20:00:00-05:00").as_deref(),
            Some("2025/08/16")
        );
        assert_eq!(
            n.normalize("Fri, 15 Aug 2025 01:00:00 +0000").as_deref(),
            Some("2025/08/15")
        );
    }

    #[test]
    fn test_unparseable_dates() {
        let n = jst();
        for bad in ["", "   ", "yesterday", "2025/13/01", "2025/8", "a/b/c", "2025-02-30"] {
            assert_eq!(n.normalize(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_today_key_uses_offset() {
        let n = jst();
        assert_eq!(n.today_key(utc("2025-08-14T16:00:00Z")), "2025/08/15");
        assert_eq!(n.today_key(utc("2025-08-14T14:59:59Z")), "2025/08/14");
    }

    #[test]
    fn test_slash_time_sorts_after_dashed_midnight() {
        let n = jst();
        let slash = n.parse("2025/08/15 10:00").unwrap();
        let dashed = n.parse("2025-08-15").unwrap();
        assert!(slash > dashed);
    }

    #[test]
    fn test_same_clock_time_differs_by_spelling() {
        let n = jst();
        assert_eq!(n.normalize("2025/08/15 20:00").as_deref(), Some("2025/08/15"));
        assert_eq!(n.normalize("2025-08-15 20:00").as_deref(), Some("2025/08/16"));
        let slash = n.parse("2025/08/15 20:00").unwrap();
        let dashed = n.parse("2025-08-15 20:00").unwrap();
        assert_eq!(dashed - slash, Duration::hours(9));
    }

    #[test]
    fn test_is_within_window() {
        let n = jst();
        let now = utc("2025-08-20T00:00:00Z");
        assert!(n.is_within("2025-08-13", now, 7));
        assert!(n.is_within("2025-08-19 12:00", now, 7));
        assert!(!n.is_within("2025-08-12", now, 7));
        assert!(!n.is_within("2025-08-21", now, 7));
        assert!(!n.is_within("garbage", now, 7));
    }

    #[test]
    fn test_is_within_huge_window_has_no_lower_bound() {
        let n = jst();
        let now = utc("2026-01-01T00:00:00Z");
        assert!(n.is_within("1900-01-01", now, 1_000_000_000));
        assert!(n.is_within("2025-08-15", now, i64::MAX));
        assert!(!n.is_within("2026-01-02", now, i64::MAX));
    }

    #[test]
    fn test_relative_label() {
        let n = jst();
        let now = utc("2025-08-15T03:00:00Z");
        assert_eq!(n.relative_label("2025-08-15", now), "今日");
        assert_eq!(n.relative_label("2025-08-14", now), "昨日");
        assert_eq!(n.relative_label("2025-08-12", now), "3日前");
        assert_eq!(n.relative_label("2025-08-01", now), "8月1日");
        assert_eq!(n.relative_label("2025-09-01", now), "今日");
        assert_eq!(n.relative_label(" someday ", now), "someday");
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(matches!(DateNormalizer::new(30), Err(FeedError::InvalidConfig(_))));
        assert!(DateNormalizer::new(-12).is_ok());
    }
}
