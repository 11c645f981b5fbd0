//! Business logic for enrollment windows, fees and payments.
//!
//! `money` and `window` are pure and synchronous. The remaining modules are thin async
//! adapters over the `SeaORM` entities that call into them at the data-access boundary.

/// Fee schedule per school year
pub mod fee;
/// Minor-unit money conversion and formatting
pub mod money;
/// Payment recording and collection totals
pub mod payment;
/// Collection reports
pub mod report;
/// School year persistence and status sync
pub mod school_year;
/// Startup seeding from config.toml
pub mod seed;
/// Enrollment window rules
pub mod window;
