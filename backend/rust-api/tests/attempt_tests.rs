mod common;

use axum::http::StatusCode;
use chapter_quiz::services::seed_service::{seed_chapter, ChapterSeed};

#[tokio::test]
async fn test_first_attempt_is_number_one() {
    let app = common::create_test_app().await;

    let attempt_id = app.start_attempt(app.sample.id).await;

    assert_eq!(app.attempt_number(attempt_id).await, 1);
    assert_eq!(app.score(attempt_id).await, None);
}

#[tokio::test]
async fn test_attempt_numbers_increase_per_chapter() {
    let app = common::create_test_app().await;
    let other = seed_chapter(
        &app.pool,
        &ChapterSeed {
            name: "Other".to_string(),
            answers: vec!["A".to_string()],
        },
    )
    .await
    .unwrap();

    for expected in 1..=3 {
        let attempt_id = app.start_attempt(app.sample.id).await;
        assert_eq!(app.attempt_number(attempt_id).await, expected);
    }

    // Numbering is independent per chapter
    let other_attempt = app.start_attempt(other.id).await;
    assert_eq!(app.attempt_number(other_attempt).await, 1);

    let next = app.start_attempt(app.sample.id).await;
    assert_eq!(app.attempt_number(next).await, 4);
}

#[tokio::test]
async fn test_concurrent_starts_get_distinct_numbers() {
    let app = common::create_test_app().await;

    let (a, b) = tokio::join!(
        app.start_attempt(app.sample.id),
        app.start_attempt(app.sample.id)
    );

    let mut numbers = vec![app.attempt_number(a).await, app.attempt_number(b).await];
    numbers.sort();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn test_attempt_page_lists_questions() {
    let app = common::create_test_app().await;
    let attempt_id = app.start_attempt(app.sample.id).await;

    let (status, body) = app.get(&format!("/attempt/{}", attempt_id)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Attempt #1"));
    assert_eq!(body.matches("<fieldset>").count(), 5);
    assert!(body.contains(&format!("action=\"/attempt/{}\"", attempt_id)));
    assert!(body.contains("value=\"D\""));
}

#[tokio::test]
async fn test_missing_attempt_returns_not_found() {
    let app = common::create_test_app().await;

    let (status, _) = app.get("/attempt/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.post_form("/attempt/999999", "q1=A").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let responses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM response")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(responses, 0);
}

#[tokio::test]
async fn test_missing_attempt_without_form_body_returns_not_found() {
    let app = common::create_test_app().await;

    let (status, location) = app.post_empty("/attempt/999999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(location.is_none());
}
