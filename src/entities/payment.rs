//! Payment entity - Money received against a fee.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Fee this payment settles (fully or partially)
    pub fee_id: i64,
    /// Amount received in currency minor units, always positive
    pub amount_cents: i64,
    /// Optional receipt or transaction reference
    pub reference: Option<String>,
    /// When the payment was recorded
    pub paid_at: DateTimeUtc,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one fee
    #[sea_orm(
        belongs_to = "super::fee::Entity",
        from = "Column::FeeId",
        to = "super::fee::Column::Id"
    )]
    Fee,
}

impl Related<super::fee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
