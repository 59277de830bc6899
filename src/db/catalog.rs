//! Flat reference-table storage (ACS, chapters, groups, library, refs,
//! subject matter codes, sources, tests, text constants, binary data).
//!
//! Each upsert is keyed by the table's remote key and overwrites every
//! mapped field, matching the sync pipeline's full-overwrite semantics.

use crate::models::{
    Acs, BinaryData, Chapter, FigureSection, Group, Library, Ref, Source, SubjectMatterCode, Test,
    TextConst,
};
use crate::Result;
use sqlx::SqlitePool;

pub async fn upsert_acs(pool: &SqlitePool, acs: &Acs) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO acs (
            remote_id, group_id, parent_id, code, description,
            is_completed_code, last_modified
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            group_id = excluded.group_id,
            parent_id = excluded.parent_id,
            code = excluded.code,
            description = excluded.description,
            is_completed_code = excluded.is_completed_code,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(acs.remote_id)
    .bind(acs.group_id)
    .bind(acs.parent_id)
    .bind(&acs.code)
    .bind(&acs.description)
    .bind(acs.is_completed_code)
    .bind(&acs.last_modified)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_binary_data(pool: &SqlitePool, data: &BinaryData) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO binary_data (
            remote_id, category, group_id, image_name, description,
            file_name, bin_type, bin_data, last_modified
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            category = excluded.category,
            group_id = excluded.group_id,
            image_name = excluded.image_name,
            description = excluded.description,
            file_name = excluded.file_name,
            bin_type = excluded.bin_type,
            bin_data = excluded.bin_data,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(data.remote_id)
    .bind(data.category)
    .bind(data.group_id)
    .bind(&data.image_name)
    .bind(&data.description)
    .bind(&data.file_name)
    .bind(data.bin_type)
    .bind(&data.bin_data)
    .bind(&data.last_modified)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_chapter(pool: &SqlitePool, chapter: &Chapter) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chapters (chapter_id, chapter_name, group_id, sort_by, last_modified)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(chapter_id) DO UPDATE SET
            chapter_name = excluded.chapter_name,
            group_id = excluded.group_id,
            sort_by = excluded.sort_by,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(chapter.chapter_id)
    .bind(&chapter.chapter_name)
    .bind(chapter.group_id)
    .bind(chapter.sort_by)
    .bind(&chapter.last_modified)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_figure_section(pool: &SqlitePool, section: &FigureSection) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO figure_sections (figure_section_id, figure_section, last_modified)
        VALUES (?, ?, ?)
        ON CONFLICT(figure_section_id) DO UPDATE SET
            figure_section = excluded.figure_section,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(section.figure_section_id)
    .bind(&section.figure_section)
    .bind(&section.last_modified)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_group(pool: &SqlitePool, group: &Group) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO groups (group_id, group_name, group_abbr, last_modified)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(group_id) DO UPDATE SET
            group_name = excluded.group_name,
            group_abbr = excluded.group_abbr,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(group.group_id)
    .bind(&group.group_name)
    .bind(&group.group_abbr)
    .bind(&group.last_modified)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_library(pool: &SqlitePool, library: &Library) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO library (
            remote_id, region, parent_id, name, description,
            is_section, source, ordinal, last_modified
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            region = excluded.region,
            parent_id = excluded.parent_id,
            name = excluded.name,
            description = excluded.description,
            is_section = excluded.is_section,
            source = excluded.source,
            ordinal = excluded.ordinal,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(library.remote_id)
    .bind(&library.region)
    .bind(library.parent_id)
    .bind(&library.name)
    .bind(&library.description)
    .bind(library.is_section)
    .bind(&library.source)
    .bind(library.ordinal)
    .bind(&library.last_modified)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_ref(pool: &SqlitePool, reference: &Ref) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO refs (ref_id, ref_text, last_modified)
        VALUES (?, ?, ?)
        ON CONFLICT(ref_id) DO UPDATE SET
            ref_text = excluded.ref_text,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(reference.ref_id)
    .bind(&reference.ref_text)
    .bind(&reference.last_modified)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_subject_matter_code(
    pool: &SqlitePool,
    smc: &SubjectMatterCode,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO subject_matter_codes (
            remote_id, code, source_id, description, last_modified, is_lsc
        ) VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            code = excluded.code,
            source_id = excluded.source_id,
            description = excluded.description,
            last_modified = excluded.last_modified,
            is_lsc = excluded.is_lsc
        "#,
    )
    .bind(smc.remote_id)
    .bind(&smc.code)
    .bind(smc.source_id)
    .bind(&smc.description)
    .bind(&smc.last_modified)
    .bind(smc.is_lsc)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_source(pool: &SqlitePool, source: &Source) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sources (remote_id, author, title, abbreviation, last_modified)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            author = excluded.author,
            title = excluded.title,
            abbreviation = excluded.abbreviation,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(source.remote_id)
    .bind(&source.author)
    .bind(&source.title)
    .bind(&source.abbreviation)
    .bind(&source.last_modified)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_test(pool: &SqlitePool, test: &Test) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tests (test_id, test_name, test_abbr, group_id, sort_by, last_modified)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(test_id) DO UPDATE SET
            test_name = excluded.test_name,
            test_abbr = excluded.test_abbr,
            group_id = excluded.group_id,
            sort_by = excluded.sort_by,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(test.test_id)
    .bind(&test.test_name)
    .bind(&test.test_abbr)
    .bind(test.group_id)
    .bind(test.sort_by)
    .bind(&test.last_modified)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_text_const(pool: &SqlitePool, text_const: &TextConst) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO text_const (
            remote_id, const_name, const_value, group_id, test_id, last_modified
        ) VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(remote_id) DO UPDATE SET
            const_name = excluded.const_name,
            const_value = excluded.const_value,
            group_id = excluded.group_id,
            test_id = excluded.test_id,
            last_modified = excluded.last_modified
        "#,
    )
    .bind(text_const.remote_id)
    .bind(&text_const.const_name)
    .bind(&text_const.const_value)
    .bind(text_const.group_id)
    .bind(text_const.test_id)
    .bind(&text_const.last_modified)
    .execute(pool)
    .await?;
    Ok(())
}
