//! Fee entity - A charge levied for a school year (tuition, miscellaneous, etc).
//!
//! `amount_cents` is nullable: NULL means the amount has not been set yet, which is
//! different from a free (zero) fee.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    /// Unique identifier for the fee
    #[sea_orm(primary_key)]
    pub id: i64,
    /// School year this fee belongs to
    pub school_year_id: i64,
    /// Human-readable fee name
    pub name: String,
    /// Amount in currency minor units, NULL when unset
    pub amount_cents: Option<i64>,
}

/// Defines relationships between Fee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each fee belongs to one school year
    #[sea_orm(
        belongs_to = "super::school_year::Entity",
        from = "Column::SchoolYearId",
        to = "super::school_year::Column::Id"
    )]
    SchoolYear,
    /// One fee has many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::school_year::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchoolYear.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
