//! Question association-table storage (many-to-many resolution records).

use crate::models::{QuestionAcs, QuestionRefImage, QuestionReference, QuestionTest};
use crate::Result;
use sqlx::SqlitePool;

pub async fn upsert_question_acs(pool: &SqlitePool, link: &QuestionAcs) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO question_acs (remote_id, question_id, acs_id)
        VALUES (?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            question_id = excluded.question_id,
            acs_id = excluded.acs_id
        "#,
    )
    .bind(link.remote_id)
    .bind(link.question_id)
    .bind(link.acs_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_question_ref_image(pool: &SqlitePool, link: &QuestionRefImage) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO question_ref_images (remote_id, question_id, image_id, annotation)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            question_id = excluded.question_id,
            image_id = excluded.image_id,
            annotation = excluded.annotation
        "#,
    )
    .bind(link.remote_id)
    .bind(link.question_id)
    .bind(link.image_id)
    .bind(&link.annotation)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_question_reference(pool: &SqlitePool, link: &QuestionReference) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO question_references (remote_id, question_id, ref_id)
        VALUES (?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            question_id = excluded.question_id,
            ref_id = excluded.ref_id
        "#,
    )
    .bind(link.remote_id)
    .bind(link.question_id)
    .bind(link.ref_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_question_test(pool: &SqlitePool, link: &QuestionTest) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO question_tests (
            remote_id, question_id, test_id, is_linked, sort_by, link_chapter, is_important
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            question_id = excluded.question_id,
            test_id = excluded.test_id,
            is_linked = excluded.is_linked,
            sort_by = excluded.sort_by,
            link_chapter = excluded.link_chapter,
            is_important = excluded.is_important
        "#,
    )
    .bind(link.remote_id)
    .bind(link.question_id)
    .bind(link.test_id)
    .bind(link.is_linked)
    .bind(link.sort_by)
    .bind(link.link_chapter)
    .bind(link.is_important)
    .execute(pool)
    .await?;
    Ok(())
}
