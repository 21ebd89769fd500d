use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tera::Context;

use crate::metrics;
use crate::services::{AppState, QuizError};
use crate::views;

pub mod attempts;
pub mod chapters;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        if err.is_not_found() {
            ApiError::NotFound(err.to_string())
        } else {
            tracing::error!("Request failed: {}", err);
            ApiError::Internal("Something went wrong. Please try again later.".to_string())
        }
    }
}

impl From<tera::Error> for ApiError {
    fn from(err: tera::Error) -> Self {
        tracing::error!("Failed to render template: {:?}", err);
        ApiError::Internal("Failed to render page".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        let mut context = Context::new();
        context.insert("status", &status.to_string());
        context.insert("message", &message);

        match views::render("error.html", &context) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (status, message).into_response()
            }
        }
    }
}

pub async fn fallback() -> ApiError {
    ApiError::not_found("Page not found")
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = check_database(&state).await;
    let healthy = database.get("status").and_then(|v| v.as_str()) == Some("healthy");

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": if healthy { "healthy" } else { "degraded" },
            "service": "chapter-quiz",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": { "database": database }
        })),
    )
}

async fn check_database(state: &AppState) -> serde_json::Map<String, serde_json::Value> {
    let mut result = serde_json::Map::new();

    match tokio::time::timeout(
        std::time::Duration::from_secs(1),
        sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&state.pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            result.insert("status".to_string(), json!("healthy"));
        }
        Ok(Err(e)) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!(format!("Database error: {}", e)));
        }
        Err(_) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!("Database timeout after 1s"));
        }
    }

    result
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}
