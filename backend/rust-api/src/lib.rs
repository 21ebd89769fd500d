use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;
pub mod views;

pub use config::Config;
pub use services::AppState;

/// Adds a Content-Security-Policy header to every response. Pages use inline
/// styles only and post forms back to this origin.
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             style-src 'self' 'unsafe-inline'; \
             form-action 'self'; \
             frame-ancestors 'none'",
        ),
    );
    response
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // Operational endpoints
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        // Quiz pages
        .merge(quiz_routes())
        .fallback(handlers::fallback)
        .with_state(app_state)
        .layer(middleware::from_fn(csp_middleware))
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn quiz_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::chapters::index))
        .route(
            "/chapter/{id}",
            get(handlers::chapters::show_chapter).post(handlers::chapters::start_attempt),
        )
        .route(
            "/attempt/{id}",
            get(handlers::attempts::show_attempt).post(handlers::attempts::submit_answers),
        )
        .route("/results/{id}", get(handlers::attempts::show_results))
}
