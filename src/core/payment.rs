//! Payment business logic - recording money received and totalling collections.

use crate::{
    core::money::MoneyValue,
    entities::{Fee, Payment, fee, payment},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Records a payment against a fee.
///
/// The amount must be positive after truncation to minor units; `0.001` with two decimal
/// places is rejected rather than stored as a zero payment.
pub async fn record_payment(
    db: &DatabaseConnection,
    fee_id: i64,
    amount: Decimal,
    reference: Option<String>,
    money: &MoneyValue,
) -> Result<payment::Model> {
    let amount_cents = money
        .from_decimal(Some(amount))?
        .filter(|cents| *cents > 0)
        .ok_or(Error::InvalidAmount { amount })?;

    let fee = Fee::find_by_id(fee_id)
        .one(db)
        .await?
        .ok_or(Error::FeeNotFound { id: fee_id })?;

    let payment = payment::ActiveModel {
        fee_id: Set(fee.id),
        amount_cents: Set(amount_cents),
        reference: Set(reference),
        paid_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = payment.insert(db).await?;
    info!(
        "Recorded payment of {} for fee '{}'",
        money.format_cents(result.amount_cents),
        fee.name
    );
    Ok(result)
}

/// Payments for one fee, oldest first.
pub async fn get_payments_for_fee(
    db: &DatabaseConnection,
    fee_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::FeeId.eq(fee_id))
        .order_by_asc(payment::Column::PaidAt)
        .order_by_asc(payment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sum of every payment made against the school year's fees, in minor units.
pub async fn total_collected_cents(db: &DatabaseConnection, school_year_id: i64) -> Result<i64> {
    let fee_ids: Vec<i64> = Fee::find()
        .filter(fee::Column::SchoolYearId.eq(school_year_id))
        .all(db)
        .await?
        .into_iter()
        .map(|fee| fee.id)
        .collect();

    if fee_ids.is_empty() {
        return Ok(0);
    }

    let payments = Payment::find()
        .filter(payment::Column::FeeId.is_in(fee_ids))
        .all(db)
        .await?;

    Ok(payments
        .iter()
        .fold(0_i64, |total, payment| total.saturating_add(payment.amount_cents)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[tokio::test]
    async fn test_record_payment() -> Result<()> {
        let db = setup_test_db().await?;
        let money = MoneyValue::default();
        let school_year = create_test_school_year(&db, "SY 2025-2026").await?;
        let fee = create_test_fee(&db, school_year.id, "Tuition", Some(1_500_000)).await?;

        let payment = record_payment(
            &db,
            fee.id,
            dec("5000.25"),
            Some("OR-0001".to_string()),
            &money,
        )
        .await?;

        assert_eq!(payment.fee_id, fee.id);
        assert_eq!(payment.amount_cents, 500_025);
        assert_eq!(payment.reference.as_deref(), Some("OR-0001"));

        Ok(())
    }

    #[tokio::test]
    async fn test_record_payment_rejects_non_positive() -> Result<()> {
        let db = setup_test_db().await?;
        let money = MoneyValue::default();
        let school_year = create_test_school_year(&db, "SY 2025-2026").await?;
        let fee = create_test_fee(&db, school_year.id, "Tuition", Some(1_500_000)).await?;

        for amount in ["0", "-10.00", "0.009"] {
            let result = record_payment(&db, fee.id, dec(amount), None, &money).await;
            assert!(
                matches!(result, Err(Error::InvalidAmount { .. })),
                "amount {amount} should be rejected"
            );
        }

        assert!(get_payments_for_fee(&db, fee.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_record_payment_unknown_fee() -> Result<()> {
        let db = setup_test_db().await?;
        let money = MoneyValue::default();

        let result = record_payment(&db, 42, dec("100.00"), None, &money).await;
        assert!(matches!(result, Err(Error::FeeNotFound { id: 42 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_total_collected_cents_is_scoped_to_school_year() -> Result<()> {
        let db = setup_test_db().await?;
        let money = MoneyValue::default();
        let this_year = create_test_school_year(&db, "SY 2025-2026").await?;
        let next_year = create_test_school_year(&db, "SY 2026-2027").await?;

        let tuition = create_test_fee(&db, this_year.id, "Tuition", Some(1_500_000)).await?;
        let books = create_test_fee(&db, this_year.id, "Books", None).await?;
        let other = create_test_fee(&db, next_year.id, "Tuition", Some(1_600_000)).await?;

        record_payment(&db, tuition.id, dec("5000.00"), None, &money).await?;
        record_payment(&db, tuition.id, dec("2500.50"), None, &money).await?;
        record_payment(&db, books.id, dec("800.00"), None, &money).await?;
        record_payment(&db, other.id, dec("9999.99"), None, &money).await?;

        assert_eq!(total_collected_cents(&db, this_year.id).await?, 830_050);
        assert_eq!(total_collected_cents(&db, next_year.id).await?, 999_999);
        assert_eq!(get_payments_for_fee(&db, tuition.id).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_total_collected_cents_without_fees() -> Result<()> {
        let db = setup_test_db().await?;
        let school_year = create_test_school_year(&db, "SY 2025-2026").await?;

        assert_eq!(total_collected_cents(&db, school_year.id).await?, 0);

        Ok(())
    }
}
