/*
[INPUT]:  Human-entered token quantities and stored base-unit integers
[OUTPUT]: Base-unit amounts for the ledger and truncated display strings
[POS]:    Unit conversion layer - pure helpers shared by store, metrics and UI
[UPDATE]: When the token scale or display precision changes
*/

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{LedgerError, Result};

/// Base units (wei) per whole token
pub const WEI_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Fractional digits a base unit can express
pub const BASE_UNIT_DECIMALS: u32 = 18;

/// Fractional digits kept when rendering amounts
pub const DISPLAY_DECIMALS: u32 = 3;

/// Parse a whole-token decimal string into base units.
///
/// Accepts plain decimal notation only: ASCII digits with at most one `.`, surrounded
/// by optional whitespace ("1.5", ".25", "  2 "). `+`, digit separators and exponents
/// are not numbers here. Negative amounts (`-0` aside), more than 18 significant
/// fractional digits and totals beyond `u128` base units fail with
/// [`LedgerError::InvalidAmount`].
pub fn to_base_units(input: &str) -> Result<u128> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::invalid_amount(input, "empty amount"));
    }

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (int_digits, frac_digits) = body.split_once('.').unwrap_or((body, ""));
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(int_digits)
        || !is_digits(frac_digits)
        || (int_digits.is_empty() && frac_digits.is_empty())
    {
        return Err(LedgerError::invalid_amount(input, "not a plain decimal number"));
    }

    let frac_digits = frac_digits.trim_end_matches('0');
    if frac_digits.len() > BASE_UNIT_DECIMALS as usize {
        return Err(LedgerError::invalid_amount(
            input,
            format!("more than {BASE_UNIT_DECIMALS} fractional digits"),
        ));
    }

    let whole = if int_digits.is_empty() {
        Some(0)
    } else {
        int_digits.parse::<u128>().ok()
    };
    let fraction = if frac_digits.is_empty() {
        Some(0)
    } else {
        Decimal::from_str_exact(&format!("0.{frac_digits}"))
            .ok()
            .and_then(|fract| (fract * Decimal::from(WEI_PER_TOKEN as u64)).to_u128())
    };
    let wei = whole
        .zip(fraction)
        .and_then(|(whole, fraction)| whole.checked_mul(WEI_PER_TOKEN)?.checked_add(fraction));

    match wei {
        Some(wei) if negative && wei != 0 => {
            Err(LedgerError::invalid_amount(input, "negative amount"))
        }
        Some(wei) => Ok(wei),
        None => Err(LedgerError::invalid_amount(input, "amount out of range")),
    }
}

/// Render base units as whole tokens, truncated to three fractional digits.
pub fn to_display_units(wei: u128) -> String {
    let whole = wei / WEI_PER_TOKEN;
    let fraction = (wei % WEI_PER_TOKEN) / 10u128.pow(BASE_UNIT_DECIMALS - DISPLAY_DECIMALS);
    format!("{whole}.{fraction:0width$}", width = DISPLAY_DECIMALS as usize)
}

/// Render base units with the token symbol, e.g. `1.500 ETH`.
pub fn format_stake(wei: u128, symbol: &str) -> String {
    format!("{} {}", to_display_units(wei), symbol)
}

/// Serialize base-unit amounts as decimal strings so they survive JSON consumers
/// that cannot hold 128-bit integers.
pub mod wei_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u128>().map_err(D::Error::custom)
    }
}
