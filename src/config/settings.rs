//! Application settings loaded from `config.toml`.
//!
//! The file has three optional parts:
//!
//! ```toml
//! [currency]
//! symbol = "₱"
//! decimal_places = 2
//! decimal_separator = "."
//! thousands_separator = ","
//! symbol_position = "before"
//!
//! [calendar]
//! timezone = "Asia/Manila"
//! utc_offset = "+08:00"
//!
//! [[school_years]]
//! name = "SY 2025-2026"
//! start_date = "2025-06-01"
//! end_date = "2025-06-30"
//! regular_deadline = "2025-06-15"
//!
//! [[school_years.fees]]
//! name = "Tuition"
//! amount = "15000.00"
//! ```
//!
//! Dates are quoted ISO 8601 strings. Everything is validated while loading, so a bad
//! currency setting or window fails startup instead of surfacing later.

use crate::core::money::{CurrencyConfig, CurrencyFormat, MoneyValue};
use crate::core::window::{EnrollmentWindow, WindowDates};
use crate::errors::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    currency: CurrencyConfig,
    #[serde(default)]
    calendar: CalendarConfig,
    #[serde(default)]
    school_years: Vec<SchoolYearEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CalendarConfig {
    timezone: String,
    utc_offset: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: "Asia/Manila".to_string(),
            utc_offset: "+08:00".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SchoolYearEntry {
    name: String,
    #[serde(flatten)]
    dates: WindowDates,
    #[serde(default)]
    fees: Vec<FeeSeed>,
}

/// A fee to create alongside a seeded school year
#[derive(Debug, Clone, Deserialize)]
pub struct FeeSeed {
    /// Fee name, unique within its school year
    pub name: String,
    /// Amount in display units; omitted means "not set yet"
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// A school year to insert on startup when no school year of that name exists
#[derive(Debug, Clone)]
pub struct SchoolYearSeed {
    /// Unique school year name
    pub name: String,
    /// Validated enrollment window
    pub window: EnrollmentWindow,
    /// Fee schedule for the year
    pub fees: Vec<FeeSeed>,
}

/// The named time zone "today" is evaluated in.
///
/// Only a fixed UTC offset is supported, which is exact for zones without daylight
/// saving such as Asia/Manila.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolCalendar {
    timezone: String,
    utc_offset: FixedOffset,
}

impl SchoolCalendar {
    /// Builds a calendar from a zone name and an offset such as `+08:00`.
    pub fn new(timezone: impl Into<String>, utc_offset: &str) -> Result<Self> {
        let offset = utc_offset
            .parse::<FixedOffset>()
            .map_err(|e| Error::Config {
                message: format!("Invalid UTC offset {utc_offset:?}: {e}"),
            })?;
        Ok(Self {
            timezone: timezone.into(),
            utc_offset: offset,
        })
    }

    /// Zone name as configured, e.g. "Asia/Manila".
    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Fixed offset from UTC used for date calculations.
    #[must_use]
    pub const fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// The current calendar date in this zone. Every "today" used for window decisions comes from here.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }

    /// The calendar date in this zone at `instant`.
    #[must_use]
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }
}

impl Default for SchoolCalendar {
    fn default() -> Self {
        Self {
            timezone: "Asia/Manila".to_string(),
            utc_offset: FixedOffset::east_opt(8 * 3600).unwrap_or_else(|| Utc.fix()),
        }
    }
}

/// Fully validated application settings, immutable after startup
#[derive(Debug, Clone)]
pub struct Settings {
    /// Money conversion and display handle
    pub money: MoneyValue,
    /// Zone used to determine "today"
    pub calendar: SchoolCalendar,
    /// School years to seed
    pub school_years: Vec<SchoolYearSeed>,
}

impl Settings {
    /// Parses and validates settings from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config.toml: {e}"),
        })?;
        Self::try_from(file)
    }
}

impl TryFrom<SettingsFile> for Settings {
    type Error = Error;

    fn try_from(file: SettingsFile) -> Result<Self> {
        let format = CurrencyFormat::try_from(file.currency)?;
        let calendar = SchoolCalendar::new(file.calendar.timezone, &file.calendar.utc_offset)?;

        let school_years = file
            .school_years
            .into_iter()
            .map(|entry| {
                let window = EnrollmentWindow::new(entry.dates).map_err(|e| match e {
                    Error::InvalidWindow { message } => Error::InvalidWindow {
                        message: format!("school year {:?}: {message}", entry.name),
                    },
                    other => other,
                })?;
                Ok(SchoolYearSeed {
                    name: entry.name,
                    window,
                    fees: entry.fees,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            money: MoneyValue::new(format),
            calendar,
            school_years,
        })
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A currency, calendar or window setting fails validation
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    Settings::from_toml_str(&contents)
}

/// Loads settings from `ENROLLMENT_CONFIG`, or `./config.toml` when unset
pub fn load_default_settings() -> Result<Settings> {
    let path =
        std::env::var("ENROLLMENT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_settings(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::money::SymbolPosition;
    use crate::test_utils::date;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.money.format(), &CurrencyFormat::default());
        assert_eq!(settings.calendar, SchoolCalendar::default());
        assert!(settings.school_years.is_empty());
        assert_eq!(settings.money.format_cents(123_450), "₱1,234.50");
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [currency]
            symbol = "€"
            decimal_places = 2
            decimal_separator = ","
            thousands_separator = "."
            symbol_position = "after"

            [calendar]
            timezone = "Europe/Lisbon"
            utc_offset = "+00:00"

            [[school_years]]
            name = "SY 2025-2026"
            start_date = "2025-06-01"
            end_date = "2025-06-30"
            early_deadline = "2025-06-05"
            regular_deadline = "2025-06-15"
            allow_new_students = false

            [[school_years.fees]]
            name = "Tuition"
            amount = "15000.50"

            [[school_years.fees]]
            name = "Books"
        "#;

        let settings = Settings::from_toml_str(toml_str).unwrap();
        assert_eq!(
            settings.money.format().symbol_position(),
            SymbolPosition::After
        );
        assert_eq!(settings.money.format_cents(123_450), "1.234,50€");
        assert_eq!(settings.calendar.timezone(), "Europe/Lisbon");

        assert_eq!(settings.school_years.len(), 1);
        let seed = &settings.school_years[0];
        assert_eq!(seed.name, "SY 2025-2026");
        assert_eq!(seed.window.start_date(), date("2025-06-01"));
        assert_eq!(seed.window.early_deadline(), Some(date("2025-06-05")));
        assert_eq!(seed.window.late_deadline(), None);
        assert!(!seed.window.allows_new_students());
        assert!(seed.window.allows_returning_students());

        assert_eq!(seed.fees.len(), 2);
        assert_eq!(
            seed.fees[0].amount,
            Some(Decimal::from_str("15000.50").unwrap())
        );
        assert_eq!(seed.fees[1].amount, None);
    }

    #[test]
    fn test_negative_decimal_places_is_invalid_configuration() {
        let result = Settings::from_toml_str("[currency]\ndecimal_places = -1\n");
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_inverted_window_is_invalid_window() {
        let toml_str = r#"
            [[school_years]]
            name = "Broken"
            start_date = "2025-06-01"
            end_date = "2025-05-01"
            regular_deadline = "2025-05-15"
        "#;
        let result = Settings::from_toml_str(toml_str);
        assert!(matches!(result, Err(Error::InvalidWindow { .. })));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = Settings::from_toml_str("[currency\nsymbol = ");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_bad_offset_is_config_error() {
        let result = Settings::from_toml_str("[calendar]\nutc_offset = \"Manila\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_calendar_date_at_crosses_midnight() {
        let calendar = SchoolCalendar::default();
        // 17:30 UTC is already the next day in Manila
        let instant = Utc.with_ymd_and_hms(2025, 6, 30, 17, 30, 0).unwrap();
        assert_eq!(calendar.date_at(instant), date("2025-07-01"));

        let morning = Utc.with_ymd_and_hms(2025, 6, 30, 1, 0, 0).unwrap();
        assert_eq!(calendar.date_at(morning), date("2025-06-30"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_settings("does/not/exist.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
