//! Compact duration literals such as `30s`, `1h30m` or `250ms`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DurationError {
    #[error("empty duration")]
    Empty,

    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),

    #[error("unknown unit '{unit}' in duration '{text}'")]
    UnknownUnit { text: String, unit: String },

    #[error("malformed duration '{0}'")]
    Malformed(String),

    #[error("duration '{0}' is too large")]
    Overflow(String),
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(1_000_000_000),
        "m" => Some(60 * 1_000_000_000),
        "h" => Some(3_600 * 1_000_000_000),
        _ => None,
    }
}

/// Parses a sequence of `<digits><unit>` components written back to back.
///
/// ```
/// use std::time::Duration;
/// use directive_map::parse_duration;
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, DurationError> {
    if text.is_empty() {
        return Err(DurationError::Empty);
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let overflow = || DurationError::Overflow(text.to_string());
    let mut total: u64 = 0;
    let mut rest = text;

    while !rest.is_empty() {
        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(DurationError::Malformed(text.to_string()));
        }
        let (digits, tail) = rest.split_at(digits_end);

        let unit_end = tail.find(|c: char| c.is_ascii_digit()).unwrap_or(tail.len());
        if unit_end == 0 {
            return Err(DurationError::MissingUnit(text.to_string()));
        }
        let (unit, tail) = tail.split_at(unit_end);

        let nanos = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            text: text.to_string(),
            unit: unit.to_string(),
        })?;
        let count: u64 = digits.parse().map_err(|_| overflow())?;
        let component = count.checked_mul(nanos).ok_or_else(overflow)?;
        total = total.checked_add(component).ok_or_else(overflow)?;

        rest = tail;
    }

    Ok(Duration::from_nanos(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_components() {
        assert_eq!(parse_duration("30s"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7200)));
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn test_concatenated_components() {
        assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5400)));
        assert_eq!(
            parse_duration("1s500ms"),
            Ok(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert!(matches!(parse_duration("15"), Err(DurationError::MissingUnit(_))));
        assert!(matches!(
            parse_duration("5d"),
            Err(DurationError::UnknownUnit { .. })
        ));
        assert!(matches!(parse_duration("-5s"), Err(DurationError::Malformed(_))));
        assert!(matches!(parse_duration("1m 5s"), Err(DurationError::UnknownUnit { .. })));
        assert!(matches!(parse_duration("soon"), Err(DurationError::Malformed(_))));
    }
}
