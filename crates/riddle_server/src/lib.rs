//! Riddle Server - HTTP API for the riddle game

pub mod handlers;
pub mod types;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use handlers::AppState;
use handlers::{
    create_long_prompt, create_short_prompt, get_long_prompt_for_date, greeting, select_prompts,
};

/// CORS layer allowing `origins`, or any origin when the list is empty
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|o| HeaderValue::from_str(o))
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Build the HTTP API router
pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(greeting))
        .route("/spL/{letters}", get(select_prompts))
        .route("/longPrompts", post(create_long_prompt))
        .route("/longPrompts/{date}", get(get_long_prompt_for_date))
        .route("/shortPrompts", post(create_short_prompt))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
