//! Trading-pair symbol syntax.

use crate::errors::ValidationError;

pub const QUOTE_CURRENCY: &str = "USDT";
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MIN_BASE_LEN: usize = 2;
pub const MAX_BASE_LEN: usize = 6;

/// Validates `<BASE>USDT` symbols where BASE is 2-6 uppercase ASCII letters.
pub struct SymbolValidator;

impl SymbolValidator {
    pub fn validate(symbol: &str) -> Result<(), ValidationError> {
        validate_symbol(symbol)
    }
}

pub fn validate_symbol(symbol: &str) -> Result<(), ValidationError> {
    if symbol.is_empty() {
        return Err(ValidationError::symbol(symbol, "symbol cannot be empty"));
    }

    if !symbol.ends_with(QUOTE_CURRENCY) {
        return Err(ValidationError::symbol(
            symbol,
            format!("must end with {}", QUOTE_CURRENCY),
        ));
    }

    if symbol.matches(QUOTE_CURRENCY).count() != 1 {
        return Err(ValidationError::symbol(
            symbol,
            format!("{} must appear exactly once", QUOTE_CURRENCY),
        ));
    }

    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(ValidationError::symbol(
            symbol,
            format!(
                "length {} exceeds maximum of {}",
                symbol.len(),
                MAX_SYMBOL_LEN
            ),
        ));
    }

    // The suffix is ASCII, so this slice is on a char boundary.
    let base = &symbol[..symbol.len() - QUOTE_CURRENCY.len()];

    if !base.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ValidationError::symbol(
            symbol,
            format!(
                "base currency '{}' must contain only uppercase ASCII letters",
                base
            ),
        ));
    }

    if !(MIN_BASE_LEN..=MAX_BASE_LEN).contains(&base.len()) {
        return Err(ValidationError::symbol(
            symbol,
            format!(
                "base currency '{}' must be {}-{} letters",
                base, MIN_BASE_LEN, MAX_BASE_LEN
            ),
        ));
    }

    Ok(())
}
