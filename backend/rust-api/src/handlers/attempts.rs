use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Redirect},
    Form,
};
use std::collections::HashMap;
use std::sync::Arc;
use tera::Context;

use super::ApiError;
use crate::{
    extractors::RecordId,
    services::{
        answer_service::AnswerService, attempt_service::AttemptService,
        chapter_service::ChapterService, results_service::ResultsService, AppState,
    },
    views::{self, ANSWER_CHOICES},
};

/// GET /attempt/{id} - questions to answer
pub async fn show_attempt(
    State(state): State<Arc<AppState>>,
    RecordId(attempt_id): RecordId,
) -> Result<Html<String>, ApiError> {
    let attempt = AttemptService::new(state.pool.clone())
        .get_attempt(attempt_id)
        .await?;
    let chapters = ChapterService::new(state.pool.clone());
    let chapter = chapters.get_chapter(attempt.chapter_id).await?;
    let questions = chapters.questions_for_chapter(chapter.id).await?;

    let mut context = Context::new();
    context.insert("attempt", &attempt);
    context.insert("chapter", &chapter);
    context.insert("questions", &questions);
    context.insert("choices", &ANSWER_CHOICES);
    Ok(Html(views::render("attempt.html", &context)?))
}

/// POST /attempt/{id} - grade `q{question_id}` fields and show results.
/// A missing or unreadable form body means every question is unanswered.
pub async fn submit_answers(
    State(state): State<Arc<AppState>>,
    RecordId(attempt_id): RecordId,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let attempt = AttemptService::new(state.pool.clone())
        .get_attempt(attempt_id)
        .await?;

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(
                "No answer form for attempt {} ({}), treating all as unanswered",
                attempt_id,
                rejection
            );
            HashMap::new()
        }
    };
    tracing::info!("Submitting {} answers for attempt {}", form.len(), attempt_id);

    let chapters = ChapterService::new(state.pool.clone());
    let chapter = chapters.get_chapter(attempt.chapter_id).await?;
    let questions = chapters.questions_for_chapter(chapter.id).await?;

    AnswerService::new(state.pool.clone())
        .submit_answers(&attempt, &questions, &form)
        .await?;

    Ok(Redirect::to(&format!("/results/{}", attempt.id)))
}

/// GET /results/{id} - scored report
pub async fn show_results(
    State(state): State<Arc<AppState>>,
    RecordId(attempt_id): RecordId,
) -> Result<Html<String>, ApiError> {
    let report = ResultsService::new(state.pool.clone())
        .report(attempt_id)
        .await?;

    let context = Context::from_serialize(&report)?;
    Ok(Html(views::render("results.html", &context)?))
}
