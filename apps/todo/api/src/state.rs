//! Application state management.
//!
//! Holds what the route builders need once at startup. Handlers never see
//! this struct directly: each domain router captures its own state.

use database::postgres::DatabaseConnection;
use tokio_util::sync::CancellationToken;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: DatabaseConnection,
    /// Cancelled once the shutdown drain period is over; request tokens are its children
    pub abort: CancellationToken,
}
