//! Answer storage operations

use crate::models::Answer;
use crate::Result;
use sqlx::SqlitePool;

/// Upsert an answer keyed by remote id.
///
/// `discussion` is locally maintained and deliberately left out of the
/// conflict update so a sync cycle never clobbers it.
pub async fn upsert(pool: &SqlitePool, answer: &Answer) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO answers (
            remote_id, text, question_id, correct, choice, last_modified, discussion
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            text = excluded.text,
            question_id = excluded.question_id,
            correct = excluded.correct,
            choice = excluded.choice,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(answer.remote_id)
    .bind(&answer.text)
    .bind(answer.question_id)
    .bind(answer.correct)
    .bind(&answer.choice)
    .bind(&answer.last_modified)
    .bind(&answer.discussion)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch an answer by local id
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Answer>> {
    let answer = sqlx::query_as::<_, Answer>("SELECT * FROM answers WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(answer)
}

/// Fetch an answer by its remote key
pub async fn find_by_remote_id(pool: &SqlitePool, remote_id: i64) -> Result<Option<Answer>> {
    let answer = sqlx::query_as::<_, Answer>("SELECT * FROM answers WHERE remote_id = ?")
        .bind(remote_id)
        .fetch_optional(pool)
        .await?;
    Ok(answer)
}

/// All answers belonging to a question (by remote question id)
pub async fn for_question(pool: &SqlitePool, question_id: i64) -> Result<Vec<Answer>> {
    let answers =
        sqlx::query_as::<_, Answer>("SELECT * FROM answers WHERE question_id = ? ORDER BY choice")
            .bind(question_id)
            .fetch_all(pool)
            .await?;
    Ok(answers)
}

/// Choice letters already assigned among a question's answers
pub async fn choices_for_question(pool: &SqlitePool, question_id: i64) -> Result<Vec<String>> {
    let choices = sqlx::query_scalar::<_, String>(
        "SELECT choice FROM answers WHERE question_id = ? AND choice IS NOT NULL",
    )
    .bind(question_id)
    .fetch_all(pool)
    .await?;
    Ok(choices)
}
