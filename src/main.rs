use dotenvy::dotenv;
use enrollment_desk::{
    config::{database, settings},
    core::{report, school_year, seed},
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load and validate currency, calendar and seed settings
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    let today = settings.calendar.today();
    info!(
        "Configuration loaded; today is {} in {}",
        today,
        settings.calendar.timezone()
    );

    // 4. Initialize database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed configured school years
    seed::seed_school_years(&db, &settings, today)
        .await
        .inspect(|count| info!("Seeded {} new school year(s).", count))
        .inspect_err(|e| error!("Failed to seed school years: {}", e))?;

    // 6. Bring stored window statuses up to date
    let transitions = school_year::sync_window_statuses(&db, today).await?;
    for transition in &transitions {
        info!(
            "Enrollment for '{}' is now {} (was {})",
            transition.name, transition.to, transition.from
        );
    }

    // 7. Report on every school year
    let open = school_year::find_open_school_years(&db, today).await?;
    if open.len() > 1 {
        warn!("{} school years have an open enrollment window", open.len());
    }

    for model in school_year::get_all_school_years(&db).await? {
        let collection = report::generate_collection_report(&db, model.id, today).await?;
        info!(
            "{}",
            report::format_collection_summary(&collection, &settings.money)
        );
    }

    Ok(())
}
