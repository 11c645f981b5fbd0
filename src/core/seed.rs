//! Seeding school years and fee schedules from `config.toml`.
//!
//! Seeding is insert-only: a school year that already exists by name is left untouched,
//! including its fees, so edits made through the application survive restarts.

use crate::{
    config::settings::Settings,
    core::{fee::create_fee, school_year},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

/// Inserts every configured school year that is not in the database yet.
///
/// Returns the number of school years created.
pub async fn seed_school_years(
    db: &DatabaseConnection,
    settings: &Settings,
    today: NaiveDate,
) -> Result<usize> {
    let mut created = 0;

    for seed in &settings.school_years {
        if school_year::get_school_year_by_name(db, &seed.name)
            .await?
            .is_some()
        {
            debug!("School year '{}' already exists, skipping", seed.name);
            continue;
        }

        let model =
            school_year::create_school_year(db, seed.name.clone(), &seed.window, today).await?;
        for fee in &seed.fees {
            create_fee(db, model.id, fee.name.clone(), fee.amount, &settings.money).await?;
        }

        info!(
            "Seeded school year '{}' with {} fee(s)",
            model.name,
            seed.fees.len()
        );
        created += 1;
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fee::get_fees_for_school_year;
    use crate::test_utils::*;

    const SEED_CONFIG: &str = r#"
        [[school_years]]
        name = "SY 2025-2026"
        start_date = "2025-06-01"
        end_date = "2025-06-30"
        regular_deadline = "2025-06-15"

        [[school_years.fees]]
        name = "Tuition"
        amount = "15000.00"

        [[school_years.fees]]
        name = "Books"
    "#;

    #[tokio::test]
    async fn test_seed_school_years_inserts_once() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = Settings::from_toml_str(SEED_CONFIG)?;

        let created = seed_school_years(&db, &settings, date("2025-05-01")).await?;
        assert_eq!(created, 1);

        let again = seed_school_years(&db, &settings, date("2025-05-01")).await?;
        assert_eq!(again, 0);

        let years = school_year::get_all_school_years(&db).await?;
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].status, "upcoming");

        let fees = get_fees_for_school_year(&db, years[0].id).await?;
        assert_eq!(fees.len(), 2);
        assert_eq!(fees[0].amount_cents, Some(1_500_000));
        assert_eq!(fees[1].amount_cents, None);

        Ok(())
    }
}
