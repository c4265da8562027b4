pub use time::OffsetDateTime as Timestamp;

use time::format_description::FormatItem;
use time::macros::format_description;

use crate::{PayloadErr, PayloadResult};

/// Format of the `created_at` field, e.g. `Wed Aug 27 13:08:45 +0000 2008`.
pub const CREATED_AT_FORMAT: &[FormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
);

/// Canonical display format for Timestamp.
pub const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]");

/// Convert an epoch-millisecond string, like the `timestamp_ms` field, into a [`Timestamp`].
pub fn timestamp_from_millis_str(s: &str) -> PayloadResult<Timestamp> {
    let bad = || PayloadErr::BadTimestamp {
        field: "timestamp_ms",
        value: s.to_owned(),
    };
    let millis: i64 = s.trim().parse().map_err(|_| bad())?;
    Timestamp::from_unix_timestamp_nanos(millis as i128 * 1_000_000).map_err(|_| bad())
}

/// Parse a `created_at` date.
pub fn parse_created_at(s: &str) -> PayloadResult<Timestamp> {
    Timestamp::parse(s, CREATED_AT_FORMAT).map_err(|_| PayloadErr::BadTimestamp {
        field: "created_at",
        value: s.to_owned(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use time::{Month, Weekday};

    #[test]
    fn test_millis() {
        let ts = timestamp_from_millis_str("1294332605461").unwrap();
        assert_eq!(ts.unix_timestamp(), 1294332605);
        assert_eq!(ts.millisecond(), 461);
        assert_eq!(
            ts.format(TIMESTAMP_FORMAT).unwrap(),
            "2011-01-06T16:50:05.461"
        );
        assert!(timestamp_from_millis_str("12a").is_err());
        assert!(timestamp_from_millis_str("").is_err());
    }

    #[test]
    fn test_created_at() {
        let ts = parse_created_at("Wed Aug 27 13:08:45 +0000 2008").unwrap();
        assert_eq!(ts.year(), 2008);
        assert_eq!(ts.month(), Month::August);
        assert_eq!(ts.day(), 27);
        assert_eq!(ts.weekday(), Weekday::Wednesday);
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (13, 8, 45));
        assert_eq!(
            parse_created_at("2008-08-27"),
            Err(PayloadErr::BadTimestamp {
                field: "created_at",
                value: "2008-08-27".to_owned()
            })
        );
    }
}
