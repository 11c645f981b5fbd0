//! Fee business logic - the school year's fee schedule.
//!
//! Amounts enter as decimals and are stored as minor units through [`MoneyValue`], so the
//! truncating conversion lives in one place.

use crate::{
    core::money::MoneyValue,
    entities::{Fee, SchoolYear, fee},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Creates a fee for a school year.
///
/// `amount = None` stores NULL ("not set yet"). Negative amounts are rejected; fractions
/// below one minor unit are truncated away.
pub async fn create_fee(
    db: &DatabaseConnection,
    school_year_id: i64,
    name: String,
    amount: Option<Decimal>,
    money: &MoneyValue,
) -> Result<fee::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Fee name cannot be empty".to_string(),
        });
    }

    reject_negative(amount)?;

    SchoolYear::find_by_id(school_year_id)
        .one(db)
        .await?
        .ok_or(Error::SchoolYearNotFound { id: school_year_id })?;

    let amount_cents = money.from_decimal(amount)?;

    let fee = fee::ActiveModel {
        school_year_id: Set(school_year_id),
        name: Set(name.trim().to_string()),
        amount_cents: Set(amount_cents),
        ..Default::default()
    };

    let result = fee.insert(db).await?;
    debug!(
        "Created fee '{}' for school year {} ({:?} minor units)",
        result.name, school_year_id, result.amount_cents
    );
    Ok(result)
}

/// The fee amount as a decimal; an unset amount reads as zero.
#[must_use]
pub fn fee_amount(fee: &fee::Model, money: &MoneyValue) -> Decimal {
    money.to_decimal(fee.amount_cents)
}

/// Finds a fee by its primary key.
pub async fn get_fee_by_id(db: &DatabaseConnection, fee_id: i64) -> Result<Option<fee::Model>> {
    Fee::find_by_id(fee_id).one(db).await.map_err(Into::into)
}

/// All fees of a school year in creation order.
pub async fn get_fees_for_school_year(
    db: &DatabaseConnection,
    school_year_id: i64,
) -> Result<Vec<fee::Model>> {
    Fee::find()
        .filter(fee::Column::SchoolYearId.eq(school_year_id))
        .order_by_asc(fee::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sets or clears a fee's amount.
pub async fn update_fee_amount(
    db: &DatabaseConnection,
    fee_id: i64,
    amount: Option<Decimal>,
    money: &MoneyValue,
) -> Result<fee::Model> {
    reject_negative(amount)?;

    let fee = Fee::find_by_id(fee_id)
        .one(db)
        .await?
        .ok_or(Error::FeeNotFound { id: fee_id })?;

    let mut active_model: fee::ActiveModel = fee.into();
    active_model.amount_cents = Set(money.from_decimal(amount)?);
    active_model.update(db).await.map_err(Into::into)
}

fn reject_negative(amount: Option<Decimal>) -> Result<()> {
    match amount {
        Some(amount) if amount < Decimal::ZERO => Err(Error::InvalidAmount { amount }),
        _ => Ok(()),
    }
}
