#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chapter_quiz::{
    config::Config,
    create_router,
    models::{Chapter, Response},
    services::{
        seed_service::{seed_chapter, ChapterSeed},
        AppState,
    },
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    /// "Sample Chapter" with correct answers [A, B, C, D, A].
    pub sample: Chapter,
}

pub async fn create_test_app() -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let app_state = Arc::new(
        AppState::new(Config::in_memory())
            .await
            .expect("Failed to initialize test app state"),
    );

    let sample = seed_chapter(&app_state.pool, &ChapterSeed::sample())
        .await
        .expect("Failed to seed sample chapter");

    TestApp {
        pool: app_state.pool.clone(),
        router: create_router(app_state),
        sample,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    /// POSTs an urlencoded form and returns the status and `Location` header.
    pub async fn post_form(&self, uri: &str, form: &str) -> (StatusCode, Option<String>) {
        self.post(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
    }

    /// POSTs with no body and no content type.
    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Option<String>) {
        self.post(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn post(&self, request: Request<Body>) -> (StatusCode, Option<String>) {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        (response.status(), location)
    }

    /// Starts an attempt on `chapter_id` and returns the new attempt id.
    pub async fn start_attempt(&self, chapter_id: i64) -> i64 {
        let (status, location) = self
            .post_form(&format!("/chapter/{}", chapter_id), "")
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        id_from_location(&location.expect("missing Location header"), "/attempt/")
    }

    /// Submits `answers` (one entry per sample question, `None` = unanswered).
    pub async fn submit(&self, attempt_id: i64, answers: &[Option<&str>]) -> (StatusCode, Option<String>) {
        let question_ids = self.question_ids(self.sample.id).await;

        let form = question_ids
            .iter()
            .zip(answers)
            .filter_map(|(id, answer)| answer.map(|a| format!("q{}={}", id, a)))
            .collect::<Vec<_>>()
            .join("&");

        self.post_form(&format!("/attempt/{}", attempt_id), &form)
            .await
    }

    pub async fn attempt_number(&self, attempt_id: i64) -> i64 {
        sqlx::query_scalar("SELECT attempt_number FROM attempt WHERE id = ?")
            .bind(attempt_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn score(&self, attempt_id: i64) -> Option<i64> {
        sqlx::query_scalar("SELECT score FROM attempt WHERE id = ?")
            .bind(attempt_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// Stored responses for an attempt in insertion order.
    pub async fn responses(&self, attempt_id: i64) -> Vec<Response> {
        sqlx::query_as::<_, Response>(
            "SELECT id, attempt_id, question_id, user_answer FROM response WHERE attempt_id = ? ORDER BY id",
        )
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await
        .unwrap()
    }

    pub async fn question_ids(&self, chapter_id: i64) -> Vec<i64> {
        sqlx::query_scalar("SELECT id FROM question WHERE chapter_id = ? ORDER BY id")
            .bind(chapter_id)
            .fetch_all(&self.pool)
            .await
            .unwrap()
    }

    pub async fn response_count(&self, attempt_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM response WHERE attempt_id = ?")
            .bind(attempt_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

pub fn id_from_location(location: &str, prefix: &str) -> i64 {
    location
        .strip_prefix(prefix)
        .unwrap_or_else(|| panic!("unexpected redirect target {}", location))
        .parse()
        .unwrap()
}
