//! Collection report generation.
//!
//! This module combines a school year's window state with its fee schedule and payments into
//! a structured report. Amounts stay in minor units until [`format_collection_summary`]
//! renders them with the configured currency format.

use crate::{
    core::{
        fee::get_fees_for_school_year,
        money::MoneyValue,
        payment::total_collected_cents,
        school_year::{get_school_year_by_id, window_of},
        window::{DeadlineTier, WindowStatus},
    },
    entities::school_year,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Collection totals and window state for one school year.
#[derive(Debug, Clone)]
pub struct CollectionReport {
    /// The school year being reported on
    pub school_year: school_year::Model,
    /// Window classification on the report date
    pub status: WindowStatus,
    /// Days until the window closes, zero once closed
    pub days_remaining: i64,
    /// Next informational deadline, if one is still ahead
    pub next_deadline: Option<(DeadlineTier, NaiveDate)>,
    /// Sum of all fees that have an amount set
    pub expected_cents: i64,
    /// Sum of all payments against those fees
    pub collected_cents: i64,
    /// `expected - collected`, never below zero
    pub outstanding_cents: i64,
    /// Number of fees in the schedule
    pub fee_count: usize,
    /// Fees whose amount is still unset
    pub unset_fee_count: usize,
}

/// Builds a [`CollectionReport`] for `school_year_id` as of `today`.
pub async fn generate_collection_report(
    db: &DatabaseConnection,
    school_year_id: i64,
    today: NaiveDate,
) -> Result<CollectionReport> {
    let school_year = get_school_year_by_id(db, school_year_id)
        .await?
        .ok_or(Error::SchoolYearNotFound { id: school_year_id })?;
    let window = window_of(&school_year)?;

    let fees = get_fees_for_school_year(db, school_year_id).await?;
    let expected_cents = fees
        .iter()
        .filter_map(|fee| fee.amount_cents)
        .fold(0_i64, i64::saturating_add);
    let unset_fee_count = fees.iter().filter(|fee| fee.amount_cents.is_none()).count();

    let collected_cents = total_collected_cents(db, school_year_id).await?;

    Ok(CollectionReport {
        status: window.status(today),
        days_remaining: window.days_remaining(today),
        next_deadline: window.next_deadline(today),
        school_year,
        expected_cents,
        collected_cents,
        outstanding_cents: outstanding(expected_cents, collected_cents),
        fee_count: fees.len(),
        unset_fee_count,
    })
}

/// Amount still owed; overpayment reports as zero outstanding.
#[must_use]
pub fn outstanding(expected_cents: i64, collected_cents: i64) -> i64 {
    expected_cents.saturating_sub(collected_cents).max(0)
}

/// Renders a report as a short multi-line summary for logs.
#[must_use]
pub fn format_collection_summary(report: &CollectionReport, money: &MoneyValue) -> String {
    use std::fmt::Write;

    let mut summary = format!(
        "{} - enrollment {} ({} day(s) remaining)\n",
        report.school_year.name, report.status, report.days_remaining
    );

    if let Some((tier, date)) = report.next_deadline {
        let tier = match tier {
            DeadlineTier::Early => "early",
            DeadlineTier::Regular => "regular",
            DeadlineTier::Late => "late",
        };
        // write! is infallible when writing to String, so unwrap is safe
        writeln!(summary, "  Next deadline: {tier} registration on {date}").unwrap();
    }

    write!(
        summary,
        "  Expected: {} | Collected: {} | Outstanding: {}",
        money.format_cents(report.expected_cents),
        money.format_cents(report.collected_cents),
        money.format_cents(report.outstanding_cents)
    )
    .unwrap();

    if report.unset_fee_count > 0 {
        write!(
            summary,
            "\n  {} of {} fee(s) have no amount set",
            report.unset_fee_count, report.fee_count
        )
        .unwrap();
    }

    summary
}
