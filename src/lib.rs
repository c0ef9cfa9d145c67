pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod services;

// Shared state for the whole application
pub struct AppState {
    pub db: database::Database,
    pub config: config::Config,
}
