//! Brazilian real formatting for the price field.
//!
//! Prices are typed as a run of digits read as cents, clamped to
//! [`MIN_PRICE`]..=[`MAX_PRICE`] and shown as `R$ 1.234,56`.

use std::str::FromStr;

use rust_decimal::Decimal;
use rusty_money::{iso, Formatter, Money, Params, Position};

pub const CURRENCY_PREFIX: &str = "R$";

const MIN_CENTS: u64 = 1;
const MAX_CENTS: u64 = 1_000_000;

/// Smallest price the input accepts (0.01).
pub const MIN_PRICE: Decimal = Decimal::from_parts(MIN_CENTS as u32, 0, 0, false, 2);
/// Largest price the input accepts (10000.00).
pub const MAX_PRICE: Decimal = Decimal::from_parts(MAX_CENTS as u32, 0, 0, false, 2);

/// A price entry with its canonical value and the text shown to the user.
///
/// The display is always derived from the value, never the other way round.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceInput {
    value: Decimal,
    display: String,
}

impl PriceInput {
    pub fn from_value(value: Decimal) -> Self {
        Self {
            value,
            display: format_price(value),
        }
    }

    /// Applies one keystroke's worth of raw field text.
    pub fn from_keystrokes(raw: &str) -> Self {
        let cents = clamp_cents(raw);
        Self::from_value(Decimal::new(cents as i64, 2))
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

impl Default for PriceInput {
    fn default() -> Self {
        Self::from_value(MIN_PRICE)
    }
}

/// Reads the digits of `raw` as cents and clamps them to the accepted range.
fn clamp_cents(raw: &str) -> u64 {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .collect();
    // Anything past seven significant digits is above the cap anyway.
    if digits.len() > 7 {
        return MAX_CENTS;
    }
    let cents = digits.parse::<u64>().unwrap_or(0);
    cents.clamp(MIN_CENTS, MAX_CENTS)
}

/// Formats a price as `R$ 1.234,56`.
pub fn format_price(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    let money = Money::from_decimal(rounded, iso::BRL);
    Formatter::money(
        &money,
        Params {
            digit_separator: '.',
            exponent_separator: ',',
            separator_pattern: &[3, 3, 3, 3],
            positions: &[Position::Symbol, Position::Space, Position::Sign, Position::Amount],
            rounding: Some(2),
            symbol: Some(CURRENCY_PREFIX),
            ..Params::default()
        },
    )
}

/// Turns a displayed price back into a number.
///
/// Strips the `R$` prefix, whitespace and thousands dots, then reads the
/// decimal comma as a point.
pub fn parse_price(display: &str) -> Result<Decimal, rust_decimal::Error> {
    let plain: String = display
        .trim_start()
        .trim_start_matches(CURRENCY_PREFIX)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    Decimal::from_str(&plain)
}
