use axum::Router;
use axum_helpers::server::{
    ShutdownCoordinator, create_production_app, create_router, health_router,
};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{AppInfo, server::ServerConfig};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

/// Wrap the API routes with docs, middleware and `/health`.
fn build_app(api_routes: Router, server: &ServerConfig, app: AppInfo) -> Router {
    create_router::<openapi::ApiDoc>(api_routes, server).merge(health_router(app))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        run_migrations::<Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
    }

    let coordinator = ShutdownCoordinator::new();
    let state = AppState {
        config,
        db,
        abort: coordinator.abort_token(),
    };

    let app = build_app(
        api::routes(&state),
        &state.config.server,
        state.config.app.clone(),
    )
    .merge(api::ready_router(state.db.clone()));

    info!(
        drain_timeout = ?coordinator.drain_timeout(),
        "Starting todo API with graceful shutdown (30s cleanup timeout)"
    );

    let server = state.config.server.clone();
    let db = state.db;
    create_production_app(
        app,
        &server,
        coordinator,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Todo API shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use core_config::app_info;
    use domain_todos::{InMemoryTodoRepository, TodoService, handlers};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    fn app() -> Router {
        let service = TodoService::new(InMemoryTodoRepository::new());
        let api_routes =
            Router::new().nest("/todos", handlers::router(service, CancellationToken::new()));
        build_app(api_routes, &ServerConfig::default(), app_info!())
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_create_location_includes_mount_prefix() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/todos")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({"title": "Buy milk"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string();
        let body = json_body(response).await;
        assert_eq!(location, format!("/todos/{}", body["id"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_list_is_mounted_under_todos() {
        let response = app().oneshot(get("/todos")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_health_reports_app_info() {
        let response = app().oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["name"], "todo_api");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_error_envelope() {
        let response = app().oneshot(get("/nope")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_todo_paths() {
        let response = app().oneshot(get("/api-docs/openapi.json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["paths"].get("/todos").is_some());
        assert!(body["paths"].get("/todos/{id}").is_some());
    }
}
