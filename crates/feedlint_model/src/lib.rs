//! Semantic GTFS value types shared by the feedlint crates.
//!
//! Each type parses from the exact textual form mandated by the GTFS
//! reference and formats back to it, so `parse(format(v)) == v` holds for
//! every valid value.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum ModelParseError {
    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),
    #[error("invalid date value: {0}")]
    InvalidDateValue(String),
    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),
    #[error("invalid time value: {0}")]
    InvalidTimeValue(String),
    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),
    #[error("invalid decimal format: {0}")]
    InvalidDecimalFormat(String),
}

/// A GTFS service date in `YYYYMMDD` form, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GtfsDate {
    year: i32,
    month: u8,
    day: u8,
}

impl GtfsDate {
    pub fn parse(value: &str) -> Result<Self, ModelParseError> {
        if value.len() != 8 || !value.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(ModelParseError::InvalidDateFormat(value.to_string()));
        }

        let year: i32 = value[0..4]
            .parse()
            .map_err(|_| ModelParseError::InvalidDateFormat(value.to_string()))?;
        let month: u8 = value[4..6]
            .parse()
            .map_err(|_| ModelParseError::InvalidDateFormat(value.to_string()))?;
        let day: u8 = value[6..8]
            .parse()
            .map_err(|_| ModelParseError::InvalidDateFormat(value.to_string()))?;

        if NaiveDate::from_ymd_opt(year, month as u32, day as u32).is_none() {
            return Err(ModelParseError::InvalidDateValue(value.to_string()));
        }

        Ok(Self { year, month, day })
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month as u32, day as u32)
            .map(|_| Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn as_naive_date(&self) -> NaiveDate {
        // Constructible by invariant: parse and from_ymd both validate.
        NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32)
            .unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for GtfsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for GtfsDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GtfsDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GtfsDateVisitor;

        impl<'de> Visitor<'de> for GtfsDateVisitor {
            type Value = GtfsDate;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a GTFS date in YYYYMMDD format")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<GtfsDate, E> {
                GtfsDate::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(GtfsDateVisitor)
    }
}

/// A GTFS time of day as seconds since noon minus twelve hours.
///
/// Hours may exceed 24 for trips running past midnight of the service day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GtfsTime {
    total_seconds: u32,
}

impl GtfsTime {
    pub fn from_seconds(total_seconds: u32) -> Self {
        Self { total_seconds }
    }

    /// Parses `[H]H:MM:SS`. Minutes and seconds must be two digits.
    pub fn parse(value: &str) -> Result<Self, ModelParseError> {
        let mut parts = value.split(':');
        let (Some(hours), Some(minutes), Some(seconds), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ModelParseError::InvalidTimeFormat(value.to_string()));
        };

        if hours.is_empty()
            || hours.len() > 3
            || minutes.len() != 2
            || seconds.len() != 2
            || ![hours, minutes, seconds]
                .iter()
                .all(|part| part.chars().all(|ch| ch.is_ascii_digit()))
        {
            return Err(ModelParseError::InvalidTimeFormat(value.to_string()));
        }

        let hours: u32 = hours
            .parse()
            .map_err(|_| ModelParseError::InvalidTimeFormat(value.to_string()))?;
        let minutes: u32 = minutes
            .parse()
            .map_err(|_| ModelParseError::InvalidTimeFormat(value.to_string()))?;
        let seconds: u32 = seconds
            .parse()
            .map_err(|_| ModelParseError::InvalidTimeFormat(value.to_string()))?;

        if minutes > 59 || seconds > 59 {
            return Err(ModelParseError::InvalidTimeValue(value.to_string()));
        }

        Ok(Self {
            total_seconds: hours * 3600 + minutes * 60 + seconds,
        })
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn hours(&self) -> u32 {
        self.total_seconds / 3600
    }

    pub fn minutes(&self) -> u32 {
        (self.total_seconds % 3600) / 60
    }

    pub fn seconds(&self) -> u32 {
        self.total_seconds % 60
    }
}

impl fmt::Display for GtfsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl Serialize for GtfsTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GtfsTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GtfsTimeVisitor;

        impl<'de> Visitor<'de> for GtfsTimeVisitor {
            type Value = GtfsTime;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a GTFS time in HH:MM:SS format")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<GtfsTime, E> {
                GtfsTime::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(GtfsTimeVisitor)
    }
}

/// A 24-bit RGB color from six hex digits without a leading `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GtfsColor {
    rgb: u32,
}

impl GtfsColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgb: (r as u32) << 16 | (g as u32) << 8 | (b as u32),
        }
    }

    pub fn parse(value: &str) -> Result<Self, ModelParseError> {
        if value.len() != 6 || !value.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(ModelParseError::InvalidColorFormat(value.to_string()));
        }

        let rgb = u32::from_str_radix(value, 16)
            .map_err(|_| ModelParseError::InvalidColorFormat(value.to_string()))?;
        Ok(Self { rgb })
    }

    pub fn rgb(&self) -> u32 {
        self.rgb
    }

    /// Rec. 601 luma, used for text/background contrast checks.
    pub fn rec601_luma(&self) -> i32 {
        let r = ((self.rgb >> 16) & 0xFF) as f64;
        let g = ((self.rgb >> 8) & 0xFF) as f64;
        let b = (self.rgb & 0xFF) as f64;
        (0.30 * r + 0.59 * g + 0.11 * b) as i32
    }
}

impl fmt::Display for GtfsColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}", self.rgb)
    }
}

impl Serialize for GtfsColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GtfsColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GtfsColorVisitor;

        impl<'de> Visitor<'de> for GtfsColorVisitor {
            type Value = GtfsColor;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 6-digit GTFS color hex string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<GtfsColor, E> {
                GtfsColor::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(GtfsColorVisitor)
    }
}

/// An arbitrary-precision decimal kept in its textual form.
///
/// Currency amounts need the exact written scale (`1.50` is not `1.5` for
/// fraction-digit checks), so the value stores sign, digits and scale
/// instead of a binary float.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GtfsDecimal {
    negative: bool,
    digits: String,
    scale: u32,
}

impl GtfsDecimal {
    pub fn parse(value: &str) -> Result<Self, ModelParseError> {
        let (negative, unsigned) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value.strip_prefix('+').unwrap_or(value)),
        };

        let mut parts = unsigned.split('.');
        let int_part = parts.next().unwrap_or("");
        let frac_part = parts.next();
        if parts.next().is_some() || int_part.is_empty() {
            return Err(ModelParseError::InvalidDecimalFormat(value.to_string()));
        }
        if !int_part.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(ModelParseError::InvalidDecimalFormat(value.to_string()));
        }
        let scale = match frac_part {
            None => 0,
            Some(part) => {
                if part.is_empty() || !part.chars().all(|ch| ch.is_ascii_digit()) {
                    return Err(ModelParseError::InvalidDecimalFormat(value.to_string()));
                }
                part.len() as u32
            }
        };

        let mut digits = String::with_capacity(unsigned.len());
        digits.push_str(int_part);
        if let Some(part) = frac_part {
            digits.push_str(part);
        }

        Ok(Self {
            negative,
            digits,
            scale,
        })
    }

    /// Number of digits after the decimal point as written.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.digits.chars().all(|ch| ch == '0')
    }

    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        !self.negative && !self.is_zero()
    }

    /// Sign comparison against zero, for numeric bounds checks.
    pub fn cmp_zero(&self) -> Ordering {
        if self.is_zero() {
            Ordering::Equal
        } else if self.negative {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for GtfsDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let split = self.digits.len() - self.scale as usize;
        if self.scale == 0 {
            f.write_str(&self.digits)
        } else {
            write!(f, "{}.{}", &self.digits[..split], &self.digits[split..])
        }
    }
}

impl Serialize for GtfsDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
