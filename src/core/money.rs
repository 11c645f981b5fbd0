//! Money conversion between persisted minor units and display amounts.
//!
//! Fees and payments are stored as integer minor units (cents). This module converts them to
//! exact decimal amounts for programmatic use, converts entered decimal amounts back to minor
//! units, and renders read-only display strings such as `₱1,234.50`. Conversions go through
//! `rust_decimal` so no binary floating point is involved at any point.
//!
//! `from_decimal` truncates toward zero rather than rounding. Stored amounts depend on this, so
//! switching to half-up rounding would be a behaviour change for existing data.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

/// Largest scale a `Decimal` can carry.
pub const MAX_DECIMAL_PLACES: u32 = 28;

/// Which side of the number the currency symbol is written on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    /// `₱1,234.50`
    #[default]
    Before,
    /// `1.234,50€`
    After,
}

/// Unvalidated currency settings as they appear in `config.toml`.
///
/// Every key is optional; missing keys fall back to the Philippine peso format.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// Currency symbol, e.g. `"₱"`
    pub symbol: String,
    /// Number of minor-unit digits; must be within `0..=28`
    pub decimal_places: i32,
    /// Separator between whole and fractional digits
    pub decimal_separator: String,
    /// Separator inserted every three whole digits
    pub thousands_separator: String,
    /// Placement of the symbol
    pub symbol_position: SymbolPosition,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: "₱".to_string(),
            decimal_places: 2,
            decimal_separator: ".".to_string(),
            thousands_separator: ",".to_string(),
            symbol_position: SymbolPosition::Before,
        }
    }
}

/// Validated, immutable currency format.
///
/// Built once at startup and shared read-only; there is no global instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    symbol: String,
    decimal_places: u32,
    decimal_separator: String,
    thousands_separator: String,
    symbol_position: SymbolPosition,
}

impl CurrencyFormat {
    /// Builds a format, rejecting decimal places outside `0..=28`.
    pub fn new(
        symbol: impl Into<String>,
        decimal_places: i32,
        decimal_separator: impl Into<String>,
        thousands_separator: impl Into<String>,
        symbol_position: SymbolPosition,
    ) -> Result<Self> {
        Ok(Self {
            symbol: symbol.into(),
            decimal_places: checked_places(decimal_places)?,
            decimal_separator: decimal_separator.into(),
            thousands_separator: thousands_separator.into(),
            symbol_position,
        })
    }

    /// Currency symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of minor-unit digits.
    #[must_use]
    pub const fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Separator between whole and fractional digits.
    #[must_use]
    pub fn decimal_separator(&self) -> &str {
        &self.decimal_separator
    }

    /// Separator between groups of three whole digits.
    #[must_use]
    pub fn thousands_separator(&self) -> &str {
        &self.thousands_separator
    }

    /// Side of the number the symbol goes on.
    #[must_use]
    pub const fn symbol_position(&self) -> SymbolPosition {
        self.symbol_position
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "₱".to_string(),
            decimal_places: 2,
            decimal_separator: ".".to_string(),
            thousands_separator: ",".to_string(),
            symbol_position: SymbolPosition::Before,
        }
    }
}

impl TryFrom<CurrencyConfig> for CurrencyFormat {
    type Error = Error;

    fn try_from(config: CurrencyConfig) -> Result<Self> {
        Self::new(
            config.symbol,
            config.decimal_places,
            config.decimal_separator,
            config.thousands_separator,
            config.symbol_position,
        )
    }
}

/// Conversion handle bound to one currency format.
///
/// This is what the data-access code holds on to: it converts column values with the
/// configured number of decimal places and formats them for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoneyValue {
    format: CurrencyFormat,
}

impl MoneyValue {
    /// Wraps a validated format.
    #[must_use]
    pub const fn new(format: CurrencyFormat) -> Self {
        Self { format }
    }

    /// The format this handle converts with.
    #[must_use]
    pub const fn format(&self) -> &CurrencyFormat {
        &self.format
    }

    /// Reads a nullable minor-unit column as a decimal amount. `None` reads as zero.
    #[must_use]
    pub fn to_decimal(&self, cents: Option<i64>) -> Decimal {
        scale_down(cents.unwrap_or(0), self.format.decimal_places)
    }

    /// Converts an entered amount to minor units, truncating toward zero.
    /// `None` stays `None` so a column can be cleared.
    pub fn from_decimal(&self, amount: Option<Decimal>) -> Result<Option<i64>> {
        amount
            .map(|amount| scale_up(amount, self.format.decimal_places))
            .transpose()
    }

    /// Renders minor units for display, e.g. `₱1,234.50`.
    #[must_use]
    pub fn format_cents(&self, cents: i64) -> String {
        format_cents(cents, &self.format)
    }
}

/// Converts minor units to a decimal amount with `decimal_places` fractional digits.
///
/// `None` is treated as zero minor units. Fails only when `decimal_places` is negative
/// or larger than 28.
pub fn to_decimal(cents: Option<i64>, decimal_places: i32) -> Result<Decimal> {
    let places = checked_places(decimal_places)?;
    Ok(scale_down(cents.unwrap_or(0), places))
}

/// Converts a decimal amount to minor units, truncating toward zero.
///
/// `None` means "clear the value" and is returned unchanged. Amounts whose minor-unit count
/// does not fit an `i64` fail with [`Error::InvalidAmount`].
pub fn from_decimal(amount: Option<Decimal>, decimal_places: i32) -> Result<Option<i64>> {
    let places = checked_places(decimal_places)?;
    amount.map(|amount| scale_up(amount, places)).transpose()
}

/// Formats minor units with the given currency format.
///
/// The sign sits directly against the digits and the symbol stays outside it:
/// `₱-1,234.50` with a leading symbol, `-1.234,50€` with a trailing one.
#[must_use]
pub fn format_cents(cents: i64, format: &CurrencyFormat) -> String {
    // u32 -> usize is lossless on every supported target
    let places = format.decimal_places as usize;
    let digits = cents.unsigned_abs().to_string();
    let padded = format!("{digits:0>width$}", width = places + 1);
    let (whole, fraction) = padded.split_at(padded.len() - places);

    let mut number = group_thousands(whole, &format.thousands_separator);
    if places > 0 {
        number.push_str(&format.decimal_separator);
        number.push_str(fraction);
    }
    if cents < 0 {
        number.insert(0, '-');
    }

    match format.symbol_position {
        SymbolPosition::Before => format!("{}{number}", format.symbol),
        SymbolPosition::After => format!("{number}{}", format.symbol),
    }
}

fn checked_places(decimal_places: i32) -> Result<u32> {
    u32::try_from(decimal_places)
        .ok()
        .filter(|places| *places <= MAX_DECIMAL_PLACES)
        .ok_or_else(|| Error::InvalidConfiguration {
            message: format!(
                "decimal places must be between 0 and {MAX_DECIMAL_PLACES}, got {decimal_places}"
            ),
        })
}

fn scale_down(cents: i64, places: u32) -> Decimal {
    Decimal::new(cents, places)
}

fn scale_up(amount: Decimal, places: u32) -> Result<i64> {
    let factor = Decimal::from_i128_with_scale(10_i128.pow(places), 0);
    amount
        .checked_mul(factor)
        .and_then(|shifted| shifted.trunc().to_i64())
        .ok_or(Error::InvalidAmount { amount })
}

fn group_thousands(whole: &str, separator: &str) -> String {
    let len = whole.len();
    let mut grouped = String::with_capacity(len + (len / 3) * separator.len());
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    grouped
}
