//! Local database access
//!
//! One SQLite database holds the synchronized copy of every remote table.
//! Tables are created on startup; sync is upsert-only, so no migrations
//! beyond `CREATE TABLE IF NOT EXISTS` are required.

pub mod answers;
pub mod catalog;
pub mod images;
pub mod questions;
pub mod relations;

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize the local database connection pool
pub async fn init_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the local tables if they don't exist.
///
/// Each table mirrors one remote table, keyed locally by `id` and matched
/// against the remote snapshot by its unique remote key. Questions are
/// matched by `(remote_id, course)` since remote ids recur across courses.
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL,
            course TEXT NOT NULL,
            text TEXT,
            chapter_id INTEGER,
            smc_id INTEGER,
            source_id INTEGER,
            last_modified TEXT,
            explanation TEXT,
            old_question_id INTEGER,
            lsc_id INTEGER,
            UNIQUE(remote_id, course)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS answers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            text TEXT,
            question_id INTEGER NOT NULL,
            correct INTEGER NOT NULL DEFAULT 0,
            choice TEXT,
            last_modified TEXT,
            discussion TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            pic_type INTEGER,
            group_id INTEGER,
            test_id INTEGER,
            image_name TEXT,
            description TEXT,
            file_name TEXT,
            bin_image BLOB,
            last_modified TEXT,
            figure_section_id INTEGER,
            pixels_per_nm REAL,
            sort_by INTEGER,
            image_library_id INTEGER
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS acs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            group_id INTEGER,
            parent_id INTEGER,
            code TEXT,
            description TEXT,
            is_completed_code INTEGER,
            last_modified TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS binary_data (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            category INTEGER,
            group_id INTEGER,
            image_name TEXT,
            description TEXT,
            file_name TEXT,
            bin_type INTEGER,
            bin_data BLOB,
            last_modified TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS chapters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            chapter_id INTEGER NOT NULL UNIQUE,
            chapter_name TEXT,
            group_id INTEGER,
            sort_by INTEGER,
            last_modified TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS figure_sections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            figure_section_id INTEGER NOT NULL UNIQUE,
            figure_section TEXT,
            last_modified TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id INTEGER NOT NULL UNIQUE,
            group_name TEXT,
            group_abbr TEXT,
            last_modified TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS library (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            region TEXT,
            parent_id INTEGER,
            name TEXT,
            description TEXT,
            is_section INTEGER,
            source TEXT,
            ordinal INTEGER,
            last_modified TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS subject_matter_codes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            code TEXT,
            source_id INTEGER,
            description TEXT,
            last_modified TEXT,
            is_lsc INTEGER
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS sources (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            author TEXT,
            title TEXT,
            abbreviation TEXT,
            last_modified TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS refs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ref_id INTEGER NOT NULL UNIQUE,
            ref_text TEXT,
            last_modified TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS tests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            test_id INTEGER NOT NULL UNIQUE,
            test_name TEXT,
            test_abbr TEXT,
            group_id INTEGER,
            sort_by INTEGER,
            last_modified TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS text_const (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            const_name TEXT,
            const_value TEXT,
            group_id INTEGER,
            test_id INTEGER,
            last_modified TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS question_acs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            question_id INTEGER NOT NULL,
            acs_id INTEGER NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS question_ref_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            question_id INTEGER NOT NULL,
            image_id INTEGER NOT NULL,
            annotation TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS question_references (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            question_id INTEGER NOT NULL,
            ref_id INTEGER NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS question_tests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id INTEGER NOT NULL UNIQUE,
            question_id INTEGER NOT NULL,
            test_id INTEGER NOT NULL,
            is_linked INTEGER,
            sort_by INTEGER,
            link_chapter INTEGER,
            is_important INTEGER
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database tables initialized");

    Ok(())
}
