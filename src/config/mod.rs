/// Database connection and table creation
pub mod database;

/// Currency, calendar and seed settings from config.toml
pub mod settings;
