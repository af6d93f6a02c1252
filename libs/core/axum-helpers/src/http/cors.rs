use axum::http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::CorsLayer;

/// CORS for the configured origins.
///
/// Origins that are not valid header values are skipped with a warning. With no
/// usable origin the layer falls back to [`create_permissive_cors_layer`].
/// `Location` is exposed so browser clients can read the URI of a created resource.
pub fn create_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("No CORS origin configured, allowing any origin");
        return create_permissive_cors_layer();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::LOCATION])
        .max_age(Duration::from_secs(3600))
}

/// Allows any origin. Meant for local development.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive().expose_headers([header::LOCATION])
}
