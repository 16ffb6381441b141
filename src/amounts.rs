use ethers::types::U256;
use ethers::utils::{ format_units, parse_units, ParseUnits };

use crate::error::{ AppError, Result };

/// Parse a human-entered decimal amount into token base units.
///
/// The decimal count must come from the token being sold; callers must not
/// substitute a default when the token has not resolved yet (use
/// [`validate_decimal`] for a syntax-only check in that case).
pub fn parse_token_amount(raw: &str, decimals: u8) -> Result<U256> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::AmountParse("amount is empty".to_string()));
    }

    let parsed = parse_units(trimmed, u32::from(decimals)).map_err(|e|
        AppError::AmountParse(e.to_string())
    )?;

    match parsed {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) =>
            Err(AppError::AmountParse(format!("amount '{}' must not be negative", trimmed))),
    }
}

/// Syntax-only check of a decimal amount string, for when the selling
/// token's decimal count is not yet known: digits with at most one dot.
pub fn validate_decimal(raw: &str) -> Result<()> {
    let trimmed = raw.trim();
    let malformed = || AppError::AmountParse(format!("'{}' is not a decimal number", trimmed));

    let (integer, fraction) = match trimmed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (trimmed, None),
    };

    if integer.is_empty() && fraction.map_or(true, str::is_empty) {
        return Err(malformed());
    }
    if !integer.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }
    if let Some(frac) = fraction {
        if frac.contains('.') || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }
    }

    Ok(())
}

/// Format base units back into a human-readable decimal string, trimming
/// trailing fractional zeros.
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
    let formatted = format_units(amount, u32::from(decimals)).unwrap_or_else(|_|
        amount.to_string()
    );

    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scales_by_decimals() {
        assert_eq!(parse_token_amount("100", 6).unwrap(), U256::from(100_000_000u64));
        assert_eq!(
            parse_token_amount("1.5", 18).unwrap(),
            U256::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(parse_token_amount("7", 0).unwrap(), U256::from(7u64));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(parse_token_amount("abc", 6).is_err());
        assert!(parse_token_amount("", 6).is_err());
        assert!(parse_token_amount("   ", 6).is_err());
        assert!(parse_token_amount("1.2.3", 6).is_err());
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert!(matches!(parse_token_amount("-1", 6), Err(AppError::AmountParse(_))));
    }

    #[test]
    fn test_round_trip_up_to_trailing_zeros() {
        for (input, decimals, expected) in [
            ("100", 6u8, "100"),
            ("1.5", 18, "1.5"),
            ("0.25", 8, "0.25"),
            ("42.10", 6, "42.1"),
        ] {
            let units = parse_token_amount(input, decimals).unwrap();
            assert_eq!(format_token_amount(units, decimals), expected);
        }
    }

    #[test]
    fn test_validate_decimal() {
        assert!(validate_decimal("100").is_ok());
        assert!(validate_decimal("0.5").is_ok());
        assert!(validate_decimal(".5").is_ok());
        assert!(validate_decimal("5.").is_ok());
        assert!(validate_decimal("abc").is_err());
        assert!(validate_decimal("1.2.3").is_err());
        assert!(validate_decimal("-5").is_err());
        assert!(validate_decimal(".").is_err());
        assert!(validate_decimal("").is_err());
    }
}
