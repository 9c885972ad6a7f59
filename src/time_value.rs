use std::sync::LazyLock;

use chrono::{Datelike, Days, Month, NaiveDate};
use regex::Regex;
use serde_json::Value;

use crate::WikidataError;

/// Represents the Gregorian calendar model.
pub const GREGORIAN_CALENDAR: &str = "http://www.wikidata.org/entity/Q1985727";

/// Represents the Julian calendar model.
pub const JULIAN_CALENDAR: &str = "http://www.wikidata.org/entity/Q11184";

/// Julian dates with a larger year magnitude are rendered as stored.
const MAX_CONVERTIBLE_YEAR: i64 = 9999;

/// Julian day number of 1582-10-05 (Julian), which is 1582-10-15 (Gregorian).
const CUTOVER_JULIAN_DAY: i64 = 2_299_161;

static TIME_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^([+-])(\d+)-(\d{2})-(\d{2})T(\d{2}):(\d{2}):(\d{2})Z$").ok()
});

/// Represents the precision of a time value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimePrecision {
    BillionYears = 0,
    HundredMillionYears = 1,
    TenMillionYears = 2,
    MillionYears = 3,
    HundredMillennia = 4,
    TenMillennia = 5,
    Millennia = 6,
    Century = 7,
    Decade = 8,
    Year = 9,
    Month = 10,
    Day = 11,
    Hour = 12,
    Minute = 13,
    Second = 14,
}

impl TryFrom<u64> for TimePrecision {
    type Error = WikidataError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TimePrecision::BillionYears),
            1 => Ok(TimePrecision::HundredMillionYears),
            2 => Ok(TimePrecision::TenMillionYears),
            3 => Ok(TimePrecision::MillionYears),
            4 => Ok(TimePrecision::HundredMillennia),
            5 => Ok(TimePrecision::TenMillennia),
            6 => Ok(TimePrecision::Millennia),
            7 => Ok(TimePrecision::Century),
            8 => Ok(TimePrecision::Decade),
            9 => Ok(TimePrecision::Year),
            10 => Ok(TimePrecision::Month),
            11 => Ok(TimePrecision::Day),
            12 => Ok(TimePrecision::Hour),
            13 => Ok(TimePrecision::Minute),
            14 => Ok(TimePrecision::Second),
            other => Err(WikidataError::UnknownPrecision(other)),
        }
    }
}

impl From<TimePrecision> for u64 {
    fn from(precision: TimePrecision) -> Self {
        precision as u64
    }
}

impl TimePrecision {
    /// Divisor and unit word for the precisions coarser than a millennium.
    const fn year_scale(&self) -> Option<(i64, &'static str)> {
        match self {
            TimePrecision::TenMillennia => Some((10_000, "ten thousand years")),
            TimePrecision::HundredMillennia => Some((100_000, "hundred thousand years")),
            TimePrecision::MillionYears => Some((1_000_000, "million years")),
            TimePrecision::TenMillionYears => Some((10_000_000, "tens of millions years")),
            TimePrecision::HundredMillionYears => Some((100_000_000, "hundred million years")),
            TimePrecision::BillionYears => Some((1_000_000_000, "billion years")),
            _ => None,
        }
    }
}

/// The date and time fields of a Wikidata time string. Years are historical:
/// there is no year zero in the output of a conversion, and negative years are BC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    year: i64,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl TimeValue {
    /// Parses `±YYYY...-MM-DDTHH:MM:SSZ`. Month and day `00` become `01`.
    pub fn parse(time: &str) -> Result<Self, WikidataError> {
        let malformed = || WikidataError::MalformedTime(time.to_string());
        let caps = TIME_RE
            .as_ref()
            .and_then(|re| re.captures(time))
            .ok_or_else(malformed)?;
        let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        let magnitude: i64 = field(2).parse().map_err(|_| malformed())?;
        let year = if field(1) == "-" { -magnitude } else { magnitude };
        let number = |i: usize| field(i).parse::<u32>().map_err(|_| malformed());
        let ret = Self {
            year,
            month: number(3)?.max(1),
            day: number(4)?.max(1),
            hour: number(5)?,
            minute: number(6)?,
            second: number(7)?,
        };
        if ret.month > 12 || ret.day > 31 {
            return Err(malformed());
        }
        Ok(ret)
    }

    pub const fn year(&self) -> i64 {
        self.year
    }

    pub const fn month(&self) -> u32 {
        self.month
    }

    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Converts a Julian calendar date to the proleptic Gregorian calendar.
    /// Years beyond four digits are returned unchanged.
    pub fn julian_to_gregorian(self) -> Result<Self, WikidataError> {
        if self.year.abs() > MAX_CONVERTIBLE_YEAR {
            return Ok(self);
        }
        let offset = julian_day_number(self.year, self.month, self.day) - CUTOVER_JULIAN_DAY;
        let cutover = NaiveDate::from_ymd_opt(1582, 10, 15)
            .ok_or_else(|| WikidataError::MalformedTime("1582-10-15".into()))?;
        let date = if offset >= 0 {
            cutover.checked_add_days(Days::new(offset.unsigned_abs()))
        } else {
            cutover.checked_sub_days(Days::new(offset.unsigned_abs()))
        }
        .ok_or_else(|| WikidataError::MalformedTime(format!("{self:?}")))?;
        let astronomical = i64::from(date.year());
        Ok(Self {
            year: if astronomical <= 0 {
                astronomical - 1
            } else {
                astronomical
            },
            month: date.month(),
            day: date.day(),
            ..self
        })
    }

    fn era(&self) -> &'static str {
        if self.year < 0 {
            "BC"
        } else {
            "AD"
        }
    }

    fn year_text(&self) -> String {
        if self.year < 0 {
            format!("{} BC", self.year.unsigned_abs())
        } else {
            self.year.to_string()
        }
    }

    fn month_abbreviation(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("", |m| &m.name()[..3])
    }

    fn date_text(&self) -> String {
        format!(
            "{:02} {} {}",
            self.day,
            self.month_abbreviation(),
            self.year_text()
        )
    }

    /// Renders the value at the given precision.
    pub fn render(&self, precision: TimePrecision) -> String {
        let magnitude = self.year.unsigned_abs();
        let era = self.era();
        match precision {
            TimePrecision::Second => format!(
                "{} {:02}:{:02}:{:02}",
                self.date_text(),
                self.hour,
                self.minute,
                self.second
            ),
            TimePrecision::Minute => {
                format!("{} {:02}:{:02}", self.date_text(), self.hour, self.minute)
            }
            TimePrecision::Hour => format!("{} {:02}:00", self.date_text(), self.hour),
            TimePrecision::Day => self.date_text(),
            TimePrecision::Month => format!("{} {}", self.month_abbreviation(), self.year_text()),
            TimePrecision::Year => format!("{magnitude} {era}"),
            TimePrecision::Decade => format!("{}s {era}", magnitude / 10 * 10),
            TimePrecision::Century => {
                format!("{} century {era}", ordinal(magnitude.saturating_sub(1) / 100 + 1))
            }
            TimePrecision::Millennia => format!(
                "{} millennium {era}",
                ordinal(magnitude.saturating_sub(1) / 1000 + 1)
            ),
            coarse => {
                let (divisor, unit) = coarse.year_scale().unwrap_or((1, "years"));
                let divisor = divisor.unsigned_abs();
                let scaled = (magnitude + divisor / 2) / divisor;
                format!("{scaled} {unit} {era}")
            }
        }
    }
}

/// Julian day number of a date in the Julian calendar (historical year numbering).
fn julian_day_number(year: i64, month: u32, day: u32) -> i64 {
    let astronomical = if year < 0 { year + 1 } else { year };
    let month = i64::from(month);
    let a = (14 - month) / 12;
    let y = astronomical + 4800 - a;
    let m = month + 12 * a - 3;
    i64::from(day) + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - 32083
}

fn ordinal(n: u64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Renders a `time` datavalue payload (`{time, precision, calendarmodel}`).
/// Malformed strings and unknown precisions are errors.
pub fn format_time(value: &Value) -> Result<String, WikidataError> {
    let time = value["time"]
        .as_str()
        .ok_or_else(|| WikidataError::missing_field("time", value))?;
    let precision = value["precision"]
        .as_u64()
        .ok_or_else(|| WikidataError::missing_field("precision", value))?;
    let precision = TimePrecision::try_from(precision)?;
    let mut parsed = TimeValue::parse(time)?;
    if value["calendarmodel"].as_str() == Some(JULIAN_CALENDAR) {
        parsed = parsed.julian_to_gregorian()?;
    }
    Ok(parsed.render(precision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn time(t: &str, precision: u64) -> String {
        format_time(&json!({
            "time": t,
            "precision": precision,
            "calendarmodel": GREGORIAN_CALENDAR
        }))
        .unwrap()
    }

    fn julian(t: &str, precision: u64) -> String {
        format_time(&json!({
            "time": t,
            "precision": precision,
            "calendarmodel": JULIAN_CALENDAR
        }))
        .unwrap()
    }

    #[test]
    fn test_year_precision() {
        assert_eq!(time("+1979-00-00T00:00:00Z", 9), "1979 AD");
        assert_eq!(time("-0044-00-00T00:00:00Z", 9), "44 BC");
    }

    #[test]
    fn test_day_precision() {
        assert_eq!(time("+1952-03-11T00:00:00Z", 11), "11 Mar 1952");
        assert_eq!(time("-0044-03-15T00:00:00Z", 11), "15 Mar 44 BC");
        assert_eq!(time("+2001-05-00T00:00:00Z", 11), "01 May 2001");
    }

    #[test]
    fn test_sub_day_precisions() {
        assert_eq!(time("+2001-05-11T13:45:09Z", 14), "11 May 2001 13:45:09");
        assert_eq!(time("+2001-05-11T13:45:09Z", 13), "11 May 2001 13:45");
        assert_eq!(time("+2001-05-11T13:45:09Z", 12), "11 May 2001 13:00");
    }

    #[test]
    fn test_month_decade_century_millennium() {
        assert_eq!(time("+1979-10-00T00:00:00Z", 10), "Oct 1979");
        assert_eq!(time("+1979-00-00T00:00:00Z", 8), "1970s AD");
        assert_eq!(time("+1979-00-00T00:00:00Z", 7), "20th century AD");
        assert_eq!(time("+2000-00-00T00:00:00Z", 7), "20th century AD");
        assert_eq!(time("-0250-00-00T00:00:00Z", 7), "3rd century BC");
        assert_eq!(time("+1979-00-00T00:00:00Z", 6), "2nd millennium AD");
        assert_eq!(time("+1111-00-00T00:00:00Z", 7), "12th century AD");
    }

    #[test]
    fn test_coarse_precisions() {
        assert_eq!(time("-13798000000-00-00T00:00:00Z", 0), "14 billion years BC");
        assert_eq!(time("-5000000-00-00T00:00:00Z", 3), "5 million years BC");
        assert_eq!(time("-40000-00-00T00:00:00Z", 5), "4 ten thousand years BC");
        assert_eq!(time("-300000-00-00T00:00:00Z", 4), "3 hundred thousand years BC");
        assert_eq!(time("-20000000-00-00T00:00:00Z", 2), "2 tens of millions years BC");
        assert_eq!(time("-200000000-00-00T00:00:00Z", 1), "2 hundred million years BC");
    }

    #[test]
    fn test_julian_conversion() {
        assert_eq!(julian("+1582-10-05T00:00:00Z", 11), "15 Oct 1582");
        assert_eq!(julian("+1500-01-01T00:00:00Z", 11), "10 Jan 1500");
        assert_eq!(julian("+0100-03-01T00:00:00Z", 11), "28 Feb 100");
        assert_ne!(julian("+0100-03-01T00:00:00Z", 11), time("+0100-03-01T00:00:00Z", 11));
    }

    #[test]
    fn test_julian_large_year_not_converted() {
        let stored = TimeValue::parse("-20000-03-01T00:00:00Z").unwrap();
        assert_eq!(stored.julian_to_gregorian().unwrap(), stored);
    }

    #[test]
    fn test_malformed_time() {
        let err = format_time(&json!({"time": "1979", "precision": 9})).unwrap_err();
        assert!(matches!(err, WikidataError::MalformedTime(_)));
        let err = format_time(&json!({"time": "+1979-13-01T00:00:00Z", "precision": 9}));
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_precision() {
        let err = format_time(&json!({"time": "+1979-00-00T00:00:00Z", "precision": 15}))
            .unwrap_err();
        assert!(matches!(err, WikidataError::UnknownPrecision(15)));
    }

    #[test]
    fn test_precision_conversion() {
        assert_eq!(TimePrecision::try_from(9_u64).unwrap(), TimePrecision::Year);
        assert_eq!(u64::from(TimePrecision::Second), 14);
        assert!(TimePrecision::try_from(15_u64).is_err());
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(113), "113th");
    }
}
