use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::CrudsError;

/// Parses an amount typed by the user, accepting `.` or `,` as the decimal separator.
pub fn parse_amount(s: &str) -> Result<Decimal, CrudsError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(CrudsError::InvalidArgument("empty amount".to_string()));
    }
    if s.matches(|c: char| c == '.' || c == ',').count() > 1 {
        return Err(CrudsError::InvalidArgument(format!(
            "too many separators in {s:?}"
        )));
    }
    Decimal::from_str(&s.replace(',', "."))
        .map_err(|e| CrudsError::InvalidArgument(format!("{s:?}: {e}")))
}

/// Best-effort amount: anything that does not parse counts as zero.
pub fn amount_or_zero(s: &str) -> Decimal {
    parse_amount(s).unwrap_or(Decimal::ZERO)
}

/// Most copies a single create may insert.
pub const MAX_COPIES: u32 = 1000;

/// Number of copies requested by a count field; one unless a whole number above one.
pub fn copies(s: &str) -> Result<u32, CrudsError> {
    let s = s.trim();
    let too_many = || CrudsError::InvalidArgument(format!("count {s} is above {MAX_COPIES}"));
    match s.parse::<u64>() {
        Ok(n) if n > u64::from(MAX_COPIES) => Err(too_many()),
        Ok(n) if n > 1 => Ok(n as u32),
        Ok(_) => Ok(1),
        Err(_) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => Err(too_many()),
        Err(_) => Ok(1),
    }
}

/// Parses a displayed (1-based) row number into a store position.
pub fn parse_row_number(s: &str) -> Result<usize, CrudsError> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CrudsError::InvalidArgument(format!(
            "{s:?} is not a row number"
        ))),
    }
}
