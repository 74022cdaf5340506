//! Hexadecimal column decoding.

use crate::error::HexDecodeError;

/// Decodes a hexadecimal token into an unsigned integer.
///
/// An optional `0x`/`0X` prefix is ignored. There is no length check and no
/// leading-zero requirement, but anything that is not a hex digit is an
/// error rather than a silent zero.
pub fn decode_hex(token: &str) -> Result<u32, HexDecodeError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    if digits.is_empty() {
        return Err(HexDecodeError::Empty);
    }

    let mut value: u32 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(16).ok_or_else(|| HexDecodeError::InvalidDigit {
            input: token.to_string(),
            digit: c,
        })?;
        value = value
            .checked_mul(16)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| HexDecodeError::Overflow(token.to_string()))?;
    }

    Ok(value)
}
