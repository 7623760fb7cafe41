//! CORS layer configuration.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tracing::warn;

use invitehub_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// `"*"` in the origin or header list allows any value.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if is_wildcard(&config.allowed_origins) {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(parse_all::<HeaderValue>("origin", &config.allowed_origins))
    };

    let headers = if is_wildcard(&config.allowed_headers) {
        AllowHeaders::from(Any)
    } else {
        AllowHeaders::list(parse_all::<HeaderName>("header", &config.allowed_headers))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(parse_all::<Method>("method", &config.allowed_methods))
        .allow_headers(headers)
        .max_age(Duration::from_secs(config.max_age_seconds))
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == "*")
}

/// Parse every entry, skipping (and reporting) the ones that are not valid.
fn parse_all<T: FromStr>(what: &str, values: &[String]) -> Vec<T> {
    values
        .iter()
        .filter_map(|raw| match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(value = %raw, "Ignoring invalid CORS {what}");
                None
            }
        })
        .collect()
}
