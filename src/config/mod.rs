/// Database connection and table creation
pub mod database;

/// Application configuration from config.toml
pub mod settings;
