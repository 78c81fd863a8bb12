//! Date, epoch and timezone helpers shared by the parsers and serializers.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Current wall-clock time as epoch seconds.
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_ymd(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Resolve an IANA zone name such as `Europe/London`.
pub fn parse_zone(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

/// The instant `secs` after the epoch, expressed in `tz`.
pub fn epoch_in(secs: i64, tz: Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.with_timezone(&tz))
}

/// Midnight at the start of `date` in `tz`.
///
/// Zones that skip midnight on a DST change resolve to the first instant that
/// exists on that date.
pub fn midnight_in(date: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
    let start = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&start).earliest().or_else(|| {
        (1..=3)
            .filter_map(|h| date.and_hms_opt(h, 0, 0))
            .find_map(|t| tz.from_local_datetime(&t).earliest())
    })
}

/// Epoch seconds of midnight UTC on `date`.
pub fn date_to_epoch(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, Timelike};

    #[test]
    fn parse_ymd_accepts_date_only() {
        assert_eq!(
            parse_ymd("2019-01-01"),
            NaiveDate::from_ymd_opt(2019, 1, 1)
        );
        assert!(parse_ymd("2019-13-01").is_none());
        assert!(parse_ymd("2019-01-01T00:00:00").is_none());
        assert!(parse_ymd("not-a-date").is_none());
    }

    #[test]
    fn parse_zone_rejects_unknown_names() {
        assert_eq!(parse_zone("Europe/London"), Some(chrono_tz::Europe::London));
        assert!(parse_zone("Mars/Olympus_Mons").is_none());
    }

    #[test]
    fn epoch_keeps_instant_and_zone() {
        let dt = epoch_in(1409596058, chrono_tz::America::Los_Angeles).unwrap();
        assert_eq!(dt.timestamp(), 1409596058);
        assert_eq!(dt.timezone(), chrono_tz::America::Los_Angeles);
    }

    #[test]
    fn midnight_is_local_to_zone() {
        let date = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
        let dt = midnight_in(date, chrono_tz::America::Los_Angeles).unwrap();
        assert_eq!(dt.date_naive(), date);
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.offset().fix().local_minus_utc(), -8 * 3600);
        assert_eq!(dt.timestamp(), 1546416000);
    }

    #[test]
    fn date_to_epoch_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        assert_eq!(date_to_epoch(date), Some(1546300800));
    }
}
