use std::fmt;

use serde_json::Value;

/// Money is represented as integer cents to avoid floating-point drift.
/// One currency unit is 100 cents, so a 1000 seat price is 100000 cents.
pub type Cents = i64;

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a user-entered decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
///
/// This is the strict parser for fresh input. Stored data goes through
/// [`coerce_cents`] instead.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let negative = input.starts_with('-');
    let input = input.trim_start_matches('-');

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (input, ""),
    };

    if !decimal_str.chars().all(|c| c.is_ascii_digit())
        || (units_str.is_empty() && decimal_str.is_empty())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?
    };

    // Pad a single digit ("5" means 50 cents), truncate anything past two digits
    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => {
            decimal_str
                .parse::<i64>()
                .map_err(|_| ParseCentsError::InvalidFormat)?
                * 10
        }
        _ => decimal_str
            .get(..2)
            .ok_or(ParseCentsError::InvalidFormat)?
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseCentsError::InvalidFormat)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

/// Sanitize a stored amount into cents.
///
/// Stored documents may carry amounts as JSON numbers or as strings, and older
/// records contain garbage. Numbers and numeric strings are read as currency
/// units; everything else (non-numeric text, NaN, infinities, null, booleans,
/// arrays, objects) counts as zero. This is the only place the zero rule lives.
///
/// Amounts beyond the `i64` range saturate at its bounds, and the ledger sums
/// them with saturating arithmetic, so oversized legacy values clamp totals
/// instead of wrapping.
pub fn coerce_cents(value: &Value) -> Cents {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(units) => units.saturating_mul(100),
            None => n.as_f64().map(units_to_cents).unwrap_or(0),
        },
        Value::String(s) => s.trim().parse::<f64>().map(units_to_cents).unwrap_or(0),
        _ => 0,
    }
}

/// Sanitize a stored count such as a seat capacity.
///
/// Same zero rule as [`coerce_cents`]. Fractions are truncated and the result is
/// clamped into `u32`, so negative counts read as zero.
pub fn coerce_count(value: &Value) -> u32 {
    let count = match value {
        Value::Number(n) => match n.as_u64() {
            Some(count) => return u32::try_from(count).unwrap_or(u32::MAX),
            None => n.as_f64(),
        },
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match count {
        // `as` saturates, negative values land on 0
        Some(count) if count.is_finite() => count as u32,
        _ => 0,
    }
}

fn units_to_cents(units: f64) -> Cents {
    if !units.is_finite() {
        return 0;
    }
    // `as` saturates at the i64 bounds
    (units * 100.0).round() as Cents
}

/// Serde adapter for amount fields in the stored document.
///
/// Reads any JSON value through [`coerce_cents`]; writes a plain number in
/// currency units (an integer when the amount is whole) so the document keeps
/// the shape older clients wrote.
pub mod lenient {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use super::{Cents, coerce_cents};

    pub fn serialize<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
        if cents % 100 == 0 {
            serializer.serialize_i64(cents / 100)
        } else {
            serializer.serialize_f64(*cents as f64 / 100.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cents, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_cents(&value))
    }
}

/// Serde adapter for count fields in the stored document, read through
/// [`coerce_count`] and written as a plain integer.
pub mod lenient_count {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use super::coerce_count;

    pub fn serialize<S: Serializer>(count: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*count)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_count(&value))
    }
}
