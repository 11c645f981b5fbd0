//! School year entity - One enrollment cycle and its window dates.
//!
//! The date columns mirror `WindowDates`; `status` caches the last classification written by
//! the status sync (`upcoming`, `open` or `closed`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// School year database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "school_years")]
pub struct Model {
    /// Unique identifier for the school year
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, e.g. "SY 2025-2026"
    #[sea_orm(unique)]
    pub name: String,
    /// First day applications are accepted
    pub start_date: Date,
    /// Last day applications are accepted
    pub end_date: Date,
    /// Optional early registration deadline
    pub early_deadline: Option<Date>,
    /// Regular registration deadline
    pub regular_deadline: Date,
    /// Optional late registration deadline
    pub late_deadline: Option<Date>,
    /// Whether first-time students may apply
    pub allow_new_students: bool,
    /// Whether returning students may re-enroll
    pub allow_returning_students: bool,
    /// Last persisted window status
    pub status: String,
}

/// Defines relationships between `SchoolYear` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One school year has many fees
    #[sea_orm(has_many = "super::fee::Entity")]
    Fees,
}

impl Related<super::fee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
