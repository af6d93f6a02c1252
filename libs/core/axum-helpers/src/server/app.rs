use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::{method_not_allowed, not_found};
use crate::http::{create_cors_layer, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Combine `apis` with the OpenAPI viewers and the shared middleware stack.
///
/// - `/swagger-ui`, `/redoc`, `/rapidoc`, `/scalar`, raw document at `/api-docs/openapi.json`
/// - JSON 404 and 405 fallbacks
/// - request tracing, security headers, CORS from `server_config.allowed_origins`, compression
///
/// `apis` is merged at the root, so domain routers choose their own prefixes.
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> Router
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .merge(apis)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(create_cors_layer(&server_config.allowed_origins))
        .layer(CompressionLayer::new())
}

/// Bind `server_config.address()` and serve `router` until shutdown.
///
/// A background task begins shutdown on SIGINT/SIGTERM. See [`serve_until_shutdown`].
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    coordinator: ShutdownCoordinator,
    cleanup_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(server_config.address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let signal_waiter = coordinator.clone();
    let signal_task = tokio::spawn(async move { signal_waiter.wait_for_signal().await });

    let result =
        serve_until_shutdown(listener, router, coordinator, cleanup_timeout, cleanup).await;

    signal_task.await.ok();
    result
}

/// Serve on `listener` until the coordinator's root token is cancelled.
///
/// Axum then stops accepting connections and drains in-flight requests. Requests
/// still running after the coordinator's drain timeout have their abort tokens
/// cancelled. Once the server has stopped, `cleanup` runs bounded by `cleanup_timeout`.
pub async fn serve_until_shutdown<F>(
    listener: TcpListener,
    router: Router,
    coordinator: ShutdownCoordinator,
    cleanup_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let drain_watcher = coordinator.clone();
    let drain_task = tokio::spawn(async move { drain_watcher.abort_after_drain().await });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinator.token().cancelled_owned())
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Server error"));

    // Nothing is left to drain; this also unblocks the watcher tasks.
    coordinator.abort_requests();
    drain_task.await.ok();

    info!(timeout = ?cleanup_timeout, "Running cleanup");
    match tokio::time::timeout(cleanup_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed"),
        Err(_) => warn!(timeout = ?cleanup_timeout, "Cleanup timed out, forcing shutdown"),
    }

    serve_result
}
