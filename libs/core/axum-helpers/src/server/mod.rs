//! Router assembly, health endpoints and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{
//!     ShutdownCoordinator, create_production_app, create_router, health_router,
//! };
//! use core_config::app_info;
//!
//! let coordinator = ShutdownCoordinator::new();
//! let abort = coordinator.abort_token(); // hand to domain routers
//! let router = create_router::<ApiDoc>(api_routes, &server_config)
//!     .merge(health_router(app_info!()));
//!
//! let cleanup_timeout = Duration::from_secs(30);
//! create_production_app(router, &server_config, coordinator, cleanup_timeout, cleanup).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router, serve_until_shutdown};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{DEFAULT_DRAIN_TIMEOUT, ShutdownCoordinator, shutdown_signal};
