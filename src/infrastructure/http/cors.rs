use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::controllers::speech::X_INTERNAL_SECRET;
use crate::infrastructure::config::AllowedOrigins;
use crate::infrastructure::middleware::X_REQUEST_ID;

/// Build a Tower CORS layer from the configured allow-list
pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(X_INTERNAL_SECRET),
            HeaderName::from_static(X_REQUEST_ID),
        ])
        .expose_headers([
            HeaderName::from_static(X_REQUEST_ID),
            HeaderName::from_static("x-character-count"),
            HeaderName::from_static("x-voice-used"),
        ]);

    match origins {
        AllowedOrigins::Any => layer.allow_origin(AllowOrigin::any()),
        AllowedOrigins::List(list) => {
            let origins: Vec<HeaderValue> = list
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
    }
}
