//! Fixed-point depth values in metres.
//!
//! # Responsibility
//! - Represent depths with exactly two fractional digits, without float drift.
//! - Parse and render the decimal wire form (`"2.50"`) used by API clients.
//!
//! # Invariants
//! - Internal unit is hundredths of a metre.
//! - Parsed values carry at most 3 integer digits and 2 fractional digits,
//!   i.e. `|value| <= 999.99`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Sub;
use std::str::FromStr;

static DEPTH_LITERAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-)?(\d+)(?:\.(\d+))?$").expect("valid depth literal regex"));

/// Maximum digits before the decimal point.
pub const MAX_INTEGER_DIGITS: usize = 3;
/// Maximum digits after the decimal point.
pub const MAX_FRACTION_DIGITS: usize = 2;

const CENTIMETERS_PER_METER: i64 = 100;
const MAX_ABS_CENTIMETERS: i64 = 99_999;

/// Depth in metres with centimetre resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Depth(i64);

impl Depth {
    pub const ZERO: Self = Self(0);

    /// Builds a depth from hundredths of a metre.
    ///
    /// Callers are responsible for staying inside the `±999.99` range; use
    /// [`Depth::try_from_centimeters`] for untrusted input.
    pub const fn from_centimeters(value: i64) -> Self {
        Self(value)
    }

    /// Builds a depth from hundredths of a metre, rejecting out-of-range input.
    pub fn try_from_centimeters(value: i64) -> Option<Self> {
        if value.abs() > MAX_ABS_CENTIMETERS {
            return None;
        }
        Some(Self(value))
    }

    /// Builds a depth from a whole number of metres.
    pub const fn from_whole_meters(value: i64) -> Self {
        Self(value * CENTIMETERS_PER_METER)
    }

    pub const fn to_centimeters(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Sub for Depth {
    type Output = Depth;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Display for Depth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per_meter = CENTIMETERS_PER_METER.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            magnitude / per_meter,
            magnitude % per_meter
        )
    }
}

/// Errors produced while parsing a depth literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepthParseError {
    /// Input is not a plain decimal number.
    Malformed(String),
    /// More than [`MAX_INTEGER_DIGITS`] digits before the decimal point.
    TooManyIntegerDigits,
    /// More than [`MAX_FRACTION_DIGITS`] digits after the decimal point.
    TooManyFractionDigits,
}

impl Display for DepthParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "a valid decimal number is required, got `{value}`"),
            Self::TooManyIntegerDigits => write!(
                f,
                "ensure that there are no more than {MAX_INTEGER_DIGITS} digits before the decimal point"
            ),
            Self::TooManyFractionDigits => write!(
                f,
                "ensure that there are no more than {MAX_FRACTION_DIGITS} decimal places"
            ),
        }
    }
}

impl Error for DepthParseError {}

impl FromStr for Depth {
    type Err = DepthParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let captures = DEPTH_LITERAL_RE
            .captures(trimmed)
            .ok_or_else(|| DepthParseError::Malformed(trimmed.to_string()))?;

        let integer = captures
            .get(2)
            .map_or("", |m| m.as_str())
            .trim_start_matches('0');
        let fraction = captures.get(3).map_or("", |m| m.as_str());

        if fraction.len() > MAX_FRACTION_DIGITS {
            return Err(DepthParseError::TooManyFractionDigits);
        }
        if integer.len() > MAX_INTEGER_DIGITS {
            return Err(DepthParseError::TooManyIntegerDigits);
        }

        let malformed = |_| DepthParseError::Malformed(trimmed.to_string());
        let whole = if integer.is_empty() {
            0
        } else {
            integer.parse::<i64>().map_err(malformed)?
        };
        let hundredths = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(malformed)? * 10,
            _ => fraction.parse::<i64>().map_err(malformed)?,
        };

        let magnitude = whole * CENTIMETERS_PER_METER + hundredths;
        if captures.get(1).is_some() {
            Ok(Self(-magnitude))
        } else {
            Ok(Self(magnitude))
        }
    }
}

impl Serialize for Depth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Depth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DepthVisitor)
    }
}

struct DepthVisitor;

impl<'de> Visitor<'de> for DepthVisitor {
    type Value = Depth;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a decimal depth in metres as a string or number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        value
            .checked_mul(CENTIMETERS_PER_METER)
            .and_then(Depth::try_from_centimeters)
            .ok_or_else(|| E::custom(DepthParseError::TooManyIntegerDigits))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        let value = i64::try_from(value)
            .map_err(|_| E::custom(DepthParseError::TooManyIntegerDigits))?;
        self.visit_i64(value)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        if !value.is_finite() {
            return Err(E::custom(DepthParseError::Malformed(value.to_string())));
        }
        // Shortest round-trip formatting keeps `30.01` as `30.01`.
        value.to_string().parse().map_err(E::custom)
    }
}
