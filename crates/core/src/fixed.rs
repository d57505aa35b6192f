//! 1e8 fixed-point helpers. Every quantity and USD price in the ledger is an
//! integer scaled by [`SCALE`]; all arithmetic is checked.

use crate::errors::CoreError;

/// Fixed-point scale: 1.0 == 100_000_000.
pub const SCALE: u128 = 100_000_000;

/// `a * b / SCALE`, truncating.
pub fn mul_scaled(a: u128, b: u128) -> Result<u128, CoreError> {
    a.checked_mul(b)
        .map(|p| p / SCALE)
        .ok_or_else(|| CoreError::Overflow(format!("{a} * {b}")))
}

/// Signed `a * b / SCALE`, truncating toward zero.
pub fn mul_scaled_signed(a: i128, b: i128) -> Result<i128, CoreError> {
    a.checked_mul(b)
        .map(|p| p / SCALE as i128)
        .ok_or_else(|| CoreError::Overflow(format!("{a} * {b}")))
}

pub fn checked_add(a: u128, b: u128) -> Result<u128, CoreError> {
    a.checked_add(b)
        .ok_or_else(|| CoreError::Overflow(format!("{a} + {b}")))
}

pub fn checked_add_signed(a: i128, b: i128) -> Result<i128, CoreError> {
    a.checked_add(b)
        .ok_or_else(|| CoreError::Overflow(format!("{a} + {b}")))
}

pub fn to_signed(v: u128) -> Result<i128, CoreError> {
    i128::try_from(v).map_err(|_| CoreError::Overflow(format!("{v} does not fit a signed value")))
}

/// Render a scaled value as a decimal string, e.g. `150000000` → `"1.5"`.
pub fn format_scaled(v: u128) -> String {
    let whole = v / SCALE;
    let frac = v % SCALE;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:08}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Signed counterpart of [`format_scaled`].
pub fn format_scaled_signed(v: i128) -> String {
    let magnitude = format_scaled(v.unsigned_abs());
    if v < 0 {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// Parse a decimal string (at most 8 fractional digits) into a scaled value.
pub fn parse_scaled(s: &str) -> Result<u128, CoreError> {
    let s = s.trim();
    let invalid = || CoreError::InvalidInput(format!("Invalid decimal amount: '{s}'"));

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if frac.len() > 8
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let frac: u128 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<8}").parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(SCALE)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| CoreError::Overflow(format!("'{s}' is too large")))
}
