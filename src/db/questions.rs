//! Question storage operations

use crate::models::Question;
use crate::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Upsert a question keyed by `(remote_id, course)`. Every mapped field is
/// overwritten from the incoming record (full-overwrite semantics).
pub async fn upsert(pool: &SqlitePool, question: &Question) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO questions (
            remote_id, course, text, chapter_id, smc_id, source_id,
            last_modified, explanation, old_question_id, lsc_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(remote_id, course) DO UPDATE SET
            text = excluded.text,
            chapter_id = excluded.chapter_id,
            smc_id = excluded.smc_id,
            source_id = excluded.source_id,
            last_modified = excluded.last_modified,
            explanation = excluded.explanation,
            old_question_id = excluded.old_question_id,
            lsc_id = excluded.lsc_id
        "#,
    )
    .bind(question.remote_id)
    .bind(&question.course)
    .bind(&question.text)
    .bind(question.chapter_id)
    .bind(question.smc_id)
    .bind(question.source_id)
    .bind(&question.last_modified)
    .bind(&question.explanation)
    .bind(question.old_question_id)
    .bind(question.lsc_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a question by local id
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Question>> {
    let question = sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(question)
}

/// Fetch a question by its remote key within one course
pub async fn find_by_remote_id_and_course(
    pool: &SqlitePool,
    remote_id: i64,
    course: &str,
) -> Result<Option<Question>> {
    let question =
        sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE remote_id = ? AND course = ?")
            .bind(remote_id)
            .bind(course)
            .fetch_optional(pool)
            .await?;
    Ok(question)
}

/// Filters for question id listing
#[derive(Debug, Default)]
pub struct QuestionFilter {
    pub course: Option<String>,
    pub chapter: Option<i64>,
    pub acs_code: Option<String>,
    pub lsc: Option<i64>,
}

/// List local question ids matching the given filters
pub async fn list_ids(pool: &SqlitePool, filter: &QuestionFilter) -> Result<Vec<i64>> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT DISTINCT q.id FROM questions q");

    if filter.acs_code.is_some() {
        builder.push(
            " JOIN question_acs qa ON qa.question_id = q.remote_id \
             JOIN acs a ON a.remote_id = qa.acs_id",
        );
    }

    builder.push(" WHERE 1 = 1");
    if let Some(course) = &filter.course {
        builder.push(" AND q.course = ").push_bind(course);
    }
    if let Some(chapter) = filter.chapter {
        builder.push(" AND q.chapter_id = ").push_bind(chapter);
    }
    if let Some(code) = &filter.acs_code {
        builder.push(" AND a.code = ").push_bind(code);
    }
    if let Some(lsc) = filter.lsc {
        builder.push(" AND q.lsc_id = ").push_bind(lsc);
    }
    builder.push(" ORDER BY q.id");

    let ids = builder.build_query_scalar::<i64>().fetch_all(pool).await?;
    Ok(ids)
}

/// Distinct chapter names for a course's questions
pub async fn chapter_names_for_course(pool: &SqlitePool, course: &str) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT c.chapter_name FROM chapters c
        JOIN questions q ON q.chapter_id = c.chapter_id
        WHERE q.course = ? AND c.chapter_name IS NOT NULL
        ORDER BY c.sort_by
        "#,
    )
    .bind(course)
    .fetch_all(pool)
    .await?;
    Ok(names)
}

/// Distinct ACS codes for a course's questions
pub async fn acs_codes_for_course(pool: &SqlitePool, course: &str) -> Result<Vec<String>> {
    let codes = sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT a.code FROM acs a
        JOIN question_acs qa ON qa.acs_id = a.remote_id
        JOIN questions q ON q.remote_id = qa.question_id
        WHERE q.course = ? AND a.code IS NOT NULL
        ORDER BY a.code
        "#,
    )
    .bind(course)
    .fetch_all(pool)
    .await?;
    Ok(codes)
}
