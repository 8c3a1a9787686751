//! Human-readable byte size literals.
//!
//! A literal is one or more `<digits><unit>` tokens separated by single
//! spaces, e.g. `1M 5K 5b`. The value is the sum of all tokens.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DataSizeError {
    #[error("empty data size")]
    Empty,

    #[error("missing unit in '{0}'")]
    MissingUnit(String),

    #[error("unknown unit '{unit}' in '{token}'")]
    UnknownUnit { token: String, unit: char },

    #[error("malformed data size token '{0}'")]
    Malformed(String),

    #[error("data size '{0}' is too large")]
    Overflow(String),
}

fn unit_multiplier(unit: char) -> Option<u64> {
    match unit {
        'b' => Some(1),
        'K' => Some(1 << 10),
        'M' => Some(1 << 20),
        'G' => Some(1 << 30),
        'T' => Some(1 << 40),
        _ => None,
    }
}

/// Parses a data size literal into a number of bytes.
///
/// `"0"` on its own is accepted; any other number needs a unit.
/// Units are case-sensitive: `b` for bytes, then `K`, `M`, `G` and `T`
/// for powers of 1024, so `1B` and `1k` are rejected.
///
/// ```
/// use directive_map::parse_data_size;
///
/// assert_eq!(parse_data_size("1M 5K 5b").unwrap(), 1_053_829);
/// assert!(parse_data_size("1M5b").is_err());
/// ```
pub fn parse_data_size(text: &str) -> Result<u64, DataSizeError> {
    if text.is_empty() {
        return Err(DataSizeError::Empty);
    }
    if text == "0" {
        return Ok(0);
    }

    let mut total: u64 = 0;
    for token in text.split(' ') {
        let bytes = parse_token(token)?;
        total = total
            .checked_add(bytes)
            .ok_or_else(|| DataSizeError::Overflow(text.to_string()))?;
    }

    Ok(total)
}

fn parse_token(token: &str) -> Result<u64, DataSizeError> {
    let malformed = || DataSizeError::Malformed(token.to_string());

    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let (digits, rest) = token.split_at(digits_end);
    if digits.is_empty() {
        return Err(malformed());
    }

    let mut rest = rest.chars();
    let unit = rest
        .next()
        .ok_or_else(|| DataSizeError::MissingUnit(token.to_string()))?;
    if rest.next().is_some() {
        return Err(malformed());
    }

    let multiplier = unit_multiplier(unit).ok_or_else(|| DataSizeError::UnknownUnit {
        token: token.to_string(),
        unit,
    })?;
    let count: u64 = digits
        .parse()
        .map_err(|_| DataSizeError::Overflow(token.to_string()))?;

    count
        .checked_mul(multiplier)
        .ok_or_else(|| DataSizeError::Overflow(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_units() {
        assert_eq!(parse_data_size("1M"), Ok(1024 * 1024));
        assert_eq!(parse_data_size("1K"), Ok(1024));
        assert_eq!(parse_data_size("1b"), Ok(1));
        assert_eq!(parse_data_size("2G"), Ok(2 * 1024 * 1024 * 1024));
    }

    #[test]
    fn test_multiple_tokens_are_summed() {
        assert_eq!(parse_data_size("1M 5b"), Ok(1024 * 1024 + 5));
        assert_eq!(parse_data_size("1M 5K 5b"), Ok(1024 * 1024 + 5 * 1024 + 5));
    }

    #[test]
    fn test_zero() {
        assert_eq!(parse_data_size("0"), Ok(0));
        assert_eq!(parse_data_size("0b"), Ok(0));
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(
            parse_data_size("1"),
            Err(DataSizeError::MissingUnit("1".into()))
        );
        assert!(matches!(
            parse_data_size("1d"),
            Err(DataSizeError::UnknownUnit { unit: 'd', .. })
        ));
        assert!(matches!(parse_data_size("d"), Err(DataSizeError::Malformed(_))));
        assert!(matches!(
            parse_data_size("unrelated"),
            Err(DataSizeError::Malformed(_))
        ));
        assert!(matches!(
            parse_data_size("1M5b"),
            Err(DataSizeError::Malformed(_))
        ));
        assert_eq!(parse_data_size(""), Err(DataSizeError::Empty));
        assert!(matches!(parse_data_size("-5M"), Err(DataSizeError::Malformed(_))));
    }

    #[test]
    fn test_units_are_case_sensitive() {
        assert!(matches!(
            parse_data_size("1B"),
            Err(DataSizeError::UnknownUnit { unit: 'B', .. })
        ));
        assert!(matches!(
            parse_data_size("1k"),
            Err(DataSizeError::UnknownUnit { unit: 'k', .. })
        ));
    }

    #[test]
    fn test_rejects_irregular_spacing() {
        assert!(parse_data_size("1M  5b").is_err());
        assert!(parse_data_size(" 1M").is_err());
        assert!(parse_data_size("1M ").is_err());
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            parse_data_size("99999999999999999999b"),
            Err(DataSizeError::Overflow(_))
        ));
        assert!(matches!(
            parse_data_size("16777216T"),
            Err(DataSizeError::Overflow(_))
        ));
    }
}
