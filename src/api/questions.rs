//! Question endpoints: read path, admin upsert, and the update triggers
//! that enter the course update pipeline.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::images::{self as images_api, ImageResponse};
use crate::db::questions::QuestionFilter;
use crate::models::{Answer, Question};
use crate::services::fetcher::ContentFetcher;
use crate::services::JobStatus;
use crate::{db, AppState, Error, Result};
use std::collections::HashMap;

/// Question with its answer set, as served to clients
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    #[serde(flatten)]
    pub question: Question,
    pub answers: Vec<Answer>,
}

/// Query parameters for question id listing
#[derive(Debug, Deserialize)]
pub struct QuestionListQuery {
    pub course: Option<String>,
    pub chapter: Option<i64>,
    pub acs: Option<String>,
    pub lsc: Option<i64>,
}

/// GET /questions
pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<QuestionListQuery>,
) -> Result<Json<Vec<i64>>> {
    let filter = QuestionFilter {
        course: query.course,
        chapter: query.chapter,
        acs_code: query.acs,
        lsc: query.lsc,
    };
    let ids = db::questions::list_ids(&state.db, &filter).await?;
    Ok(Json(ids))
}

/// GET /questions/:id
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuestionResponse>> {
    let question = db::questions::get(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Question {} not found", id)))?;
    let answers = db::answers::for_question(&state.db, question.remote_id).await?;
    Ok(Json(QuestionResponse { question, answers }))
}

/// GET /questions/:id/answers
pub async fn get_question_answers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Answer>>> {
    let question = db::questions::get(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Question {} not found", id)))?;
    let answers = db::answers::for_question(&state.db, question.remote_id).await?;
    Ok(Json(answers))
}

/// GET /questions/:id/images
pub async fn get_question_images(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ImageResponse>>> {
    let question = db::questions::get(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Question {} not found", id)))?;
    let images = db::images::for_question(&state.db, question.remote_id).await?;

    let mut responses = Vec::with_capacity(images.len());
    for image in images {
        let data = images_api::resolve_payload(&state, &image).await?;
        responses.push(ImageResponse { image, data });
    }
    Ok(Json(responses))
}

/// GET /courses/:course/chapters
pub async fn get_chapters_for_course(
    State(state): State<AppState>,
    Path(course): Path<String>,
) -> Result<Json<Vec<String>>> {
    let names = db::questions::chapter_names_for_course(&state.db, &course).await?;
    Ok(Json(names))
}

/// GET /courses/:course/acs
pub async fn get_acs_codes_for_course(
    State(state): State<AppState>,
    Path(course): Path<String>,
) -> Result<Json<Vec<String>>> {
    let codes = db::questions::acs_codes_for_course(&state.db, &course).await?;
    Ok(Json(codes))
}

/// POST /questions
///
/// Administrative upsert. Rejected before storage when the payload carries
/// no question text or course.
pub async fn save_question(
    State(state): State<AppState>,
    Json(question): Json<Question>,
) -> Result<Json<Question>> {
    if question.text.as_deref().map(str::trim).unwrap_or("").is_empty() {
        return Err(Error::InvalidInput(
            "No question information was provided".to_string(),
        ));
    }
    if question.course.trim().is_empty() {
        return Err(Error::InvalidInput("No course was provided".to_string()));
    }
    db::questions::upsert(&state.db, &question).await?;
    let saved =
        db::questions::find_by_remote_id_and_course(&state.db, question.remote_id, &question.course)
            .await?
            .ok_or_else(|| Error::Internal("Saved question not found".to_string()))?;
    Ok(Json(saved))
}

/// POST /questions/update
///
/// Fire-and-forget: the sweep runs on a spawned task and this returns
/// immediately. Progress is observable via the status endpoint.
pub async fn update_all(State(state): State<AppState>) -> StatusCode {
    let updater = state.updater.clone();
    tokio::spawn(async move {
        updater.update_all_courses().await;
    });
    StatusCode::ACCEPTED
}

/// POST /questions/update/:course
pub async fn update_course(
    State(state): State<AppState>,
    Path(course): Path<String>,
) -> Result<StatusCode> {
    // Reject unknown courses before spawning anything.
    ContentFetcher::program_id(&course)?;
    let updater = state.updater.clone();
    tokio::spawn(async move {
        updater.update_course(&course).await;
    });
    Ok(StatusCode::ACCEPTED)
}

/// GET /questions/update/status
pub async fn update_status(
    State(state): State<AppState>,
) -> Json<HashMap<String, JobStatus>> {
    Json(state.jobs.snapshot().await)
}

/// Build question routes
pub fn question_routes() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions).post(save_question))
        .route("/questions/update", post(update_all))
        .route("/questions/update/status", get(update_status))
        .route("/questions/update/:course", post(update_course))
        .route("/questions/:id", get(get_question))
        .route("/questions/:id/answers", get(get_question_answers))
        .route("/questions/:id/images", get(get_question_images))
        .route("/courses/:course/chapters", get(get_chapters_for_course))
        .route("/courses/:course/acs", get(get_acs_codes_for_course))
}
