//! Currency amounts.
//!
//! # Responsibility
//! - Represent costs exactly as integer minor units (1/100 of the currency).
//! - Parse money text the way a database `money` column renders it.
//!
//! # Invariants
//! - Fractional digits past the second must be zeros.
//! - A separator that occurs once is decimal, a repeated one groups thousands.
//! - Parsing is locale-tolerant: decimal comma and decimal point both work.

use super::ModelError;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const MINOR_PER_MAJOR: i64 = 100;
const FRACTION_DIGITS: usize = 2;

// Sign, then an optional currency marker before or after the number. Markers
// are currency symbols, ISO codes or the rouble abbreviation.
static MONEY_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<sign>-)?\s*(?P<lead>\p{Sc}|[A-Z]{3})?\s*(?P<inner_sign>-)?",
        r"(?P<number>[0-9](?:[0-9.,'\s]*[0-9])?)",
        r"\s*(?P<trail>\p{Sc}|[A-Z]{3}|руб\.?|р\.)?$",
    ))
    .expect("valid money regex")
});

/// Exact currency amount in minor units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money {
    minor_units: i64,
}

impl Money {
    pub const ZERO: Money = Money { minor_units: 0 };

    pub fn from_minor_units(minor_units: i64) -> Self {
        Self { minor_units }
    }

    /// Whole currency units, e.g. `Money::from_major(150)` is `150.00`.
    pub fn from_major(major: i64) -> Self {
        Self {
            minor_units: major * MINOR_PER_MAJOR,
        }
    }

    pub fn minor_units(self) -> i64 {
        self.minor_units
    }

    /// Applies `percentage / 100`, rounding half away from zero.
    ///
    /// Returns `None` when the result does not fit into `i64` minor units.
    pub fn checked_scaled_by_percentage(self, percentage: u32) -> Option<Self> {
        let scaled = i128::from(self.minor_units) * i128::from(percentage);
        let half = if scaled < 0 { -50 } else { 50 };
        let minor_units = i64::try_from((scaled + half) / 100).ok()?;
        Some(Self { minor_units })
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let abs = self.minor_units.unsigned_abs();
        let per_major = MINOR_PER_MAJOR.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            abs / per_major,
            abs % per_major
        )
    }
}

impl FromStr for Money {
    type Err = ModelError;

    /// Accepts `150`, `150.5`, `150,00 ₽`, `1 234,56 ₽`, `$1,234.56`, `-12.50 RUB`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ModelError::InvalidMoney(format!("`{text}`: {reason}"));

        let captures = MONEY_TEXT_RE
            .captures(text.trim())
            .ok_or_else(|| invalid("expected an amount with optional sign and currency marker"))?;
        let negative = match (captures.name("sign"), captures.name("inner_sign")) {
            (Some(_), Some(_)) => return Err(invalid("sign appears more than once")),
            (sign, inner_sign) => sign.is_some() || inner_sign.is_some(),
        };

        let compact: String = captures["number"]
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '\'')
            .collect();

        let (whole, fraction) = split_decimal(&compact).map_err(invalid)?;

        let whole_value: i64 = whole.parse().map_err(|_| invalid("amount is too large"))?;
        let fraction_value: i64 = format!("{fraction:0<width$}", width = FRACTION_DIGITS)
            .parse()
            .map_err(|_| invalid("malformed fractional part"))?;

        let minor_units = whole_value
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|value| value.checked_add(fraction_value))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Self {
            minor_units: if negative { -minor_units } else { minor_units },
        })
    }
}

/// Splits `compact` (digits, `.` and `,` only) into whole digits and up to two
/// fractional digits.
///
/// A separator that occurs once is the decimal point; digits past the second
/// fractional one must be zeros. A separator that repeats groups thousands.
fn split_decimal(compact: &str) -> Result<(String, &str), &'static str> {
    let Some(position) = compact.rfind(['.', ',']) else {
        return Ok((compact.to_string(), ""));
    };
    let separator = if compact[position..].starts_with('.') { '.' } else { ',' };
    let group_separator = if separator == '.' { ',' } else { '.' };

    if compact.matches(separator).count() > 1 {
        return Ok((grouped_digits(compact, separator)?, ""));
    }

    let whole = &compact[..position];
    let whole = if whole.contains(group_separator) {
        grouped_digits(whole, group_separator)?
    } else {
        whole.to_string()
    };

    let fraction = &compact[position + 1..];
    let (kept, rest) = fraction.split_at(fraction.len().min(FRACTION_DIGITS));
    if rest.chars().any(|digit| digit != '0') {
        return Err("more than two fractional digits");
    }
    Ok((whole, kept))
}

/// Digits of `text` when it is grouped as `1`, `12` or `123` followed by
/// `<separator>ddd` groups.
fn grouped_digits(text: &str, separator: char) -> Result<String, &'static str> {
    let mut groups = text.split(separator);
    let first = groups.next().unwrap_or_default();
    let all_digits = |group: &str| group.bytes().all(|byte| byte.is_ascii_digit());

    let first_ok = (1..=3).contains(&first.len()) && !first.starts_with('0') && all_digits(first);
    if !first_ok || !groups.all(|group| group.len() == 3 && all_digits(group)) {
        return Err("malformed digit grouping");
    }
    Ok(text.chars().filter(char::is_ascii_digit).collect())
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.minor_units))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(minor_units) => Ok(Self::from_minor_units(minor_units)),
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(|err| FromSqlError::Other(err.into()))?;
                text.parse()
                    .map_err(|err: ModelError| FromSqlError::Other(err.into()))
            }
            _ => Err(FromSqlError::InvalidType),
        }
    }
}
