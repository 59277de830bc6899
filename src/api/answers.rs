//! Answer endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{db, AppState, Error, Result};
use crate::models::Answer;

/// GET /answers/:id
pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Answer>> {
    let answer = db::answers::get(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Answer {} not found", id)))?;
    Ok(Json(answer))
}

/// Build answer routes
pub fn answer_routes() -> Router<AppState> {
    Router::new().route("/answers/:id", get(get_answer))
}
