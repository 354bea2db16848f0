use clap::ValueEnum;

pub const MISSING: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

/// Whole numbers print without a fraction, everything else with one decimal.
fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

pub mod temperature {
    use super::{number, Units, MISSING};

    pub fn c2f(temp_c: f64) -> f64 {
        temp_c * 9.0 / 5.0 + 32.0
    }

    pub fn format(temp_c: Option<f64>, units: Units) -> String {
        match (temp_c, units) {
            (None, _) => MISSING.to_string(),
            (Some(c), Units::Metric) => format!("{}°C", number(c)),
            (Some(c), Units::Imperial) => format!("{}°F", number(c2f(c).round())),
        }
    }

    #[test]
    fn test_temperature() {
        assert_eq!(c2f(0.0), 32.0);
        assert_eq!(c2f(100.0), 212.0);
        assert_eq!(format(Some(25.0), Units::Metric), "25°C");
        assert_eq!(format(Some(25.0), Units::Imperial), "77°F");
        assert_eq!(format(Some(24.5), Units::Metric), "24.5°C");
        assert_eq!(format(None, Units::Metric), "N/A");
    }
}

pub mod humidity {
    use super::{number, MISSING};

    pub fn format(percent: Option<f64>) -> String {
        percent.map_or_else(|| MISSING.to_string(), |p| format!("{}%", number(p)))
    }

    #[test]
    fn test_humidity() {
        assert_eq!(format(Some(60.0)), "60%");
        assert_eq!(format(None), "N/A");
    }
}

pub mod speed {
    use super::{number, Units, MISSING};

    const MILES_PER_KM: f64 = 0.621371;

    pub fn kph2mph(kph: f64) -> f64 {
        kph * MILES_PER_KM
    }

    pub fn format(kph: Option<f64>, units: Units) -> String {
        match (kph, units) {
            (None, _) => MISSING.to_string(),
            (Some(kph), Units::Metric) => format!("{} km/h", number(kph)),
            (Some(kph), Units::Imperial) => format!("{} mph", number(kph2mph(kph).round())),
        }
    }

    #[test]
    fn test_speed() {
        assert_eq!(format(Some(15.0), Units::Metric), "15 km/h");
        assert_eq!(format(Some(16.0), Units::Imperial), "10 mph");
        assert_eq!(format(None, Units::Imperial), "N/A");
    }
}

pub mod time {
    use chrono::{DateTime, FixedOffset, Local, NaiveDate, SecondsFormat, TimeZone, Utc};

    /// Validity periods sometimes arrive as Unix epoch seconds.
    pub fn is_epoch_seconds(raw: &str) -> bool {
        !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
    }

    /// Epoch-second strings become RFC 3339 UTC timestamps; anything else is returned as is.
    pub fn normalize(raw: &str) -> String {
        if !is_epoch_seconds(raw) {
            return raw.to_string();
        }
        raw.parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map_or_else(
                || raw.to_string(),
                |dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            )
    }

    fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(raw).ok()
    }

    pub fn format_time_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        parse(raw).map_or_else(
            || raw.to_string(),
            |dt| dt.with_timezone(tz).format("%-I:%M %p").to_string(),
        )
    }

    pub fn format_time(raw: &str) -> String {
        format_time_in(raw, &Local)
    }

    /// Time of day for a validity-period bound as the API sent it.
    pub fn display_time(raw: &str) -> String {
        format_time(&normalize(raw))
    }

    pub fn format_date(date: NaiveDate) -> String {
        date.format("%A, %-d %B %Y").to_string()
    }

    pub fn format_timestamp_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        parse(&normalize(raw)).map_or_else(
            || raw.to_string(),
            |dt| dt.with_timezone(tz).format("%-d %b %Y, %-I:%M %p").to_string(),
        )
    }

    pub fn format_timestamp(raw: &str) -> String {
        format_timestamp_in(raw, &Local)
    }

    pub fn day_label(index: usize, api_day: Option<&str>, date: NaiveDate) -> String {
        match index {
            0 => "Today".to_string(),
            1 => "Tomorrow".to_string(),
            _ => api_day
                .filter(|day| !day.is_empty())
                .map_or_else(|| date.format("%A").to_string(), str::to_string),
        }
    }

    #[test]
    fn test_epoch_detection() {
        assert!(is_epoch_seconds("1714539600"));
        assert!(!is_epoch_seconds(""));
        assert!(!is_epoch_seconds("2024-05-01T12:00:00+08:00"));
        assert!(!is_epoch_seconds("-12"));
        assert!(!is_epoch_seconds("17145 39600"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("0"), "1970-01-01T00:00:00.000Z");
        assert_eq!(normalize("1714539600"), "2024-05-01T05:00:00.000Z");
        assert_eq!(normalize("2024-05-01T12:00:00+08:00"), "2024-05-01T12:00:00+08:00");
        assert_eq!(normalize("soon"), "soon");
        // overflows i64, left alone
        assert_eq!(normalize("99999999999999999999"), "99999999999999999999");
    }

    #[test]
    fn test_epoch_and_iso_format_alike() {
        let sgt = FixedOffset::east_opt(8 * 3600).unwrap();
        let from_epoch = format_time_in(&normalize("1714539600"), &sgt);
        let from_iso = format_time_in("2024-05-01T13:00:00+08:00", &sgt);
        assert_eq!(from_epoch, "1:00 PM");
        assert_eq!(from_epoch, from_iso);
        assert_eq!(
            display_time("1714539600"),
            format_time(&Utc.timestamp_opt(1714539600, 0).unwrap().to_rfc3339())
        );
    }

    #[test]
    fn test_unparseable_time_passes_through() {
        assert_eq!(format_time("later today"), "later today");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_date(date), "Wednesday, 1 May 2024");
        assert_eq!(day_label(0, Some("Wednesday"), date), "Today");
        assert_eq!(day_label(1, Some("Thursday"), date), "Tomorrow");
        assert_eq!(day_label(2, Some("Friday"), date), "Friday");
        assert_eq!(day_label(3, None, date), "Wednesday");
        let sgt = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            format_timestamp_in("2024-05-01T05:42:00+08:00", &sgt),
            "1 May 2024, 5:42 AM"
        );
    }
}
