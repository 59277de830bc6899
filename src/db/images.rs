//! Image storage operations

use crate::models::Image;
use crate::Result;
use sqlx::SqlitePool;

/// Upsert an image keyed by remote id
pub async fn upsert(pool: &SqlitePool, image: &Image) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO images (
            remote_id, pic_type, group_id, test_id, image_name, description,
            file_name, bin_image, last_modified, figure_section_id,
            pixels_per_nm, sort_by, image_library_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            pic_type = excluded.pic_type,
            group_id = excluded.group_id,
            test_id = excluded.test_id,
            image_name = excluded.image_name,
            description = excluded.description,
            file_name = excluded.file_name,
            bin_image = excluded.bin_image,
            last_modified = excluded.last_modified,
            figure_section_id = excluded.figure_section_id,
            pixels_per_nm = excluded.pixels_per_nm,
            sort_by = excluded.sort_by,
            image_library_id = excluded.image_library_id
        "#,
    )
    .bind(image.remote_id)
    .bind(image.pic_type)
    .bind(image.group_id)
    .bind(image.test_id)
    .bind(&image.image_name)
    .bind(&image.description)
    .bind(&image.file_name)
    .bind(&image.bin_image)
    .bind(&image.last_modified)
    .bind(image.figure_section_id)
    .bind(image.pixels_per_nm)
    .bind(image.sort_by)
    .bind(image.image_library_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch an image by local id
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Image>> {
    let image = sqlx::query_as::<_, Image>("SELECT * FROM images WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(image)
}

/// All images referenced by a question (by remote question id), resolved
/// through the question_ref_images association
pub async fn for_question(pool: &SqlitePool, question_id: i64) -> Result<Vec<Image>> {
    let images = sqlx::query_as::<_, Image>(
        r#"
        SELECT i.* FROM images i
        JOIN question_ref_images qri ON qri.image_id = i.remote_id
        WHERE qri.question_id = ?
        ORDER BY i.sort_by
        "#,
    )
    .bind(question_id)
    .fetch_all(pool)
    .await?;
    Ok(images)
}
