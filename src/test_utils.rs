//! Shared test utilities for the enrollment desk.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        school_year,
        window::{EnrollmentWindow, WindowDates},
    },
    entities::{fee, school_year as school_year_entity},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Parses an ISO 8601 date, panicking on bad input.
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// June 2025 window: opens 06-01, closes 06-30, regular deadline 06-15,
/// open to new and returning students.
pub fn june_window_dates() -> WindowDates {
    WindowDates {
        start_date: date("2025-06-01"),
        end_date: date("2025-06-30"),
        early_deadline: None,
        regular_deadline: date("2025-06-15"),
        late_deadline: None,
        allow_new_students: true,
        allow_returning_students: true,
    }
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a school year using the June 2025 window, classified as of 2025-06-10.
pub async fn create_test_school_year(
    db: &DatabaseConnection,
    name: &str,
) -> Result<school_year_entity::Model> {
    let window = EnrollmentWindow::new(june_window_dates())?;
    school_year::create_school_year(db, name.to_string(), &window, date("2025-06-10")).await
}

/// Inserts a fee with a raw minor-unit amount, bypassing decimal conversion.
pub async fn create_test_fee(
    db: &DatabaseConnection,
    school_year_id: i64,
    name: &str,
    amount_cents: Option<i64>,
) -> Result<fee::Model> {
    let fee = fee::ActiveModel {
        school_year_id: Set(school_year_id),
        name: Set(name.to_string()),
        amount_cents: Set(amount_cents),
        ..Default::default()
    };
    fee.insert(db).await.map_err(Into::into)
}
