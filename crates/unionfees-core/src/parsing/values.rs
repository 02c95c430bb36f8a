use crate::config::AmountSign;
use crate::error::UnionFeesError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Fee lines carry at most four integer digits.
const MAX_AMOUNT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Parse a person or organisation number, e.g. `"19500101-1234"` or
/// `"556234-4639"`. Hyphens are dropped; the rest must be digits.
pub fn parse_identifier(s: &str) -> Result<u64, UnionFeesError> {
    let digits: String = s.trim().chars().filter(|c| *c != '-').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(UnionFeesError::MalformedIdentifier {
            value: s.to_string(),
        });
    }
    digits
        .parse::<u64>()
        .map_err(|_| UnionFeesError::MalformedIdentifier {
            value: s.to_string(),
        })
}

/// Parse an amount from the report into a two-decimal value.
///
/// Handles formats like:
/// - "570,35" -> 570.35 (Swedish decimal comma)
/// - "1 210,35" -> 1210.35 (space as thousands separator)
/// - "640" -> 640.00
/// - "-12,50" -> 12.50 with `AmountSign::Discard`, -12.50 with `Preserve`
pub fn parse_amount(s: &str, sign: AmountSign) -> Result<Decimal, UnionFeesError> {
    let malformed = || UnionFeesError::MalformedAmount {
        value: s.to_string(),
    };

    let compact: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let unsigned = match sign {
        AmountSign::Discard => compact.replace('-', ""),
        AmountSign::Preserve => compact,
    };
    let normalized = unsigned.replace(',', ".");
    if normalized.is_empty() {
        return Err(malformed());
    }

    let mut value = Decimal::from_str(&normalized).map_err(|_| malformed())?;
    if value.scale() > 2 || value.abs() >= MAX_AMOUNT {
        return Err(malformed());
    }
    value.rescale(2);
    if value.scale() != 2 {
        return Err(malformed());
    }
    Ok(value)
}
