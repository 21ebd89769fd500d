use axum::{
    extract::State,
    response::{Html, Redirect},
};
use std::sync::Arc;
use tera::Context;

use super::ApiError;
use crate::{
    extractors::RecordId,
    services::{attempt_service::AttemptService, chapter_service::ChapterService, AppState},
    views,
};

/// GET / - list every chapter
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let chapters = ChapterService::new(state.pool.clone())
        .list_chapters()
        .await?;

    let mut context = Context::new();
    context.insert("chapters", &chapters);
    Ok(Html(views::render("index.html", &context)?))
}

/// GET /chapter/{id} - chapter intro, no side effects
pub async fn show_chapter(
    State(state): State<Arc<AppState>>,
    RecordId(chapter_id): RecordId,
) -> Result<Html<String>, ApiError> {
    let service = ChapterService::new(state.pool.clone());
    let chapter = service.get_chapter(chapter_id).await?;
    let previous_attempts = service.count_attempts(chapter_id).await?;

    let mut context = Context::new();
    context.insert("chapter", &chapter);
    context.insert("previous_attempts", &previous_attempts);
    Ok(Html(views::render("chapter.html", &context)?))
}

/// POST /chapter/{id} - start a new attempt and go answer it
pub async fn start_attempt(
    State(state): State<Arc<AppState>>,
    RecordId(chapter_id): RecordId,
) -> Result<Redirect, ApiError> {
    let chapter = ChapterService::new(state.pool.clone())
        .get_chapter(chapter_id)
        .await?;

    let attempt = AttemptService::new(state.pool.clone())
        .start_attempt(chapter.id)
        .await?;

    Ok(Redirect::to(&format!("/attempt/{}", attempt.id)))
}
