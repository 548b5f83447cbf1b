//! Parsing of `"NN%"` size strings used by row and stack heights.

use thiserror::Error;

/// Why a percentage string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PercentError {
    /// Not a number once the optional `%` suffix is removed.
    #[error("'{0}' is not a percentage")]
    Malformed(String),
    /// A number outside `0..=100`.
    #[error("{0}% is outside 0%..100%")]
    OutOfRange(i64),
}

/// Parses an optional percentage.
///
/// Blank strings mean "unspecified" and yield `Ok(None)`. The `%` sign is
/// optional, so `"30%"` and `"30"` are equivalent.
///
/// ```
/// use panedeck_core::percent::parse_percent;
///
/// assert_eq!(parse_percent("30%"), Ok(Some(30)));
/// assert_eq!(parse_percent(" "), Ok(None));
/// assert!(parse_percent("120%").is_err());
/// ```
pub fn parse_percent(raw: &str) -> Result<Option<u16>, PercentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let value: i64 = digits
        .parse()
        .map_err(|_| PercentError::Malformed(raw.to_string()))?;
    if !(0..=100).contains(&value) {
        return Err(PercentError::OutOfRange(value));
    }
    Ok(Some(value as u16))
}

/// Like [`parse_percent`] but for an optional field.
pub fn parse_optional(raw: Option<&str>) -> Result<Option<u16>, PercentError> {
    raw.map_or(Ok(None), parse_percent)
}

/// `pct` percent of `total`, rounded down.
#[must_use]
pub fn percent_of(total: u16, pct: u16) -> u16 {
    (u32::from(total) * u32::from(pct) / 100) as u16
}
