//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities are the persistence side of the money and window conversions:
//! amounts are stored as minor units and window dates as plain calendar dates.

/// Fee schedule entries
pub mod fee;
/// Payments received against fees
pub mod payment;
/// School years and their enrollment windows
pub mod school_year;

// Re-export specific types to avoid conflicts
pub use fee::{Column as FeeColumn, Entity as Fee, Model as FeeModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use school_year::{
    Column as SchoolYearColumn, Entity as SchoolYear, Model as SchoolYearModel,
};
