//! Course update pipeline integration tests
//!
//! These run the sync against a locally fabricated snapshot database in
//! the provider's table layout, with decryption disabled so text fields
//! pass through unchanged.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tempfile::TempDir;

use gs_questions::services::jobs::JobState;
use gs_questions::services::{
    ContentFetcher, CourseUpdater, GsDecryptor, JobRegistry, LockMap, ALL_COURSES_KEY,
};
use gs_questions::{db, Config};

struct Harness {
    dir: TempDir,
    local: SqlitePool,
    locks: LockMap,
    jobs: JobRegistry,
    updater: CourseUpdater,
    snapshot: PathBuf,
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let local = db::init_pool(&dir.path().join("local.db")).await.unwrap();

    let config = Config {
        scratch_dir: dir.path().join("scratch").display().to_string(),
        // Nothing listens here; fetch attempts fail fast.
        content_source_url: "http://127.0.0.1:1/{gid}/{course}.db".to_string(),
        connect_timeout_ms: 1_000,
        read_timeout_ms: 2_000,
        courses: vec!["PVT".to_string(), "IFR".to_string()],
        ..Config::default()
    };
    let config = Arc::new(config);
    let fetcher = ContentFetcher::new(&config).unwrap();
    let decryptor = GsDecryptor::new(false, "", "").unwrap();
    let locks = LockMap::new(Duration::from_secs(60));
    let jobs = JobRegistry::new();
    let updater = CourseUpdater::new(
        local.clone(),
        config,
        fetcher,
        decryptor,
        locks.clone(),
        jobs.clone(),
    );

    let snapshot = dir.path().join("PVT.db");
    make_snapshot(&snapshot).await;

    Harness {
        dir,
        local,
        locks,
        jobs,
        updater,
        snapshot,
    }
}

/// Build a snapshot file in the provider's schema with a small but
/// complete data set: two questions, three answers, and one row in
/// every catalog and association table.
async fn make_snapshot(path: &Path) {
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let remote = SqlitePool::connect(&url).await.unwrap();

    let ddl = [
        "CREATE TABLE Questions (QuestionID INTEGER PRIMARY KEY, QuestionText TEXT, ChapterID INTEGER, SMCID INTEGER, SourceID INTEGER, LastMod TEXT, Explanation TEXT, OldQID INTEGER, LSCID INTEGER)",
        "CREATE TABLE Answers (AnswerID INTEGER PRIMARY KEY, AnswerText TEXT, QuestionID INTEGER, IsCorrect INTEGER, LastMod TEXT)",
        "CREATE TABLE ACS (ID INTEGER PRIMARY KEY, GroupID INTEGER, ParentID INTEGER, Code TEXT, Description TEXT, IsCompletedCode INTEGER, LastMod TEXT)",
        "CREATE TABLE BinaryData (ID INTEGER PRIMARY KEY, Category INTEGER, GroupID INTEGER, ImageName TEXT, Desc TEXT, FileName TEXT, BinType INTEGER, BinData BLOB, LastMod TEXT)",
        "CREATE TABLE Chapters (ChapterID INTEGER PRIMARY KEY, ChapterName TEXT, GroupID INTEGER, SortBy INTEGER, LastMod TEXT)",
        "CREATE TABLE FigureSections (FigureSectionID INTEGER PRIMARY KEY, FigureSection TEXT, LastMod TEXT)",
        "CREATE TABLE Groups (GroupID INTEGER PRIMARY KEY, GroupName TEXT, GroupAbbr TEXT, LastMod TEXT)",
        "CREATE TABLE Library (ID INTEGER PRIMARY KEY, Region TEXT, ParentID INTEGER, Name TEXT, Description TEXT, IsSection INTEGER, Source TEXT, Ordinal INTEGER, LastMod TEXT)",
        "CREATE TABLE Refs (RefID INTEGER PRIMARY KEY, RefText TEXT, LastMod TEXT)",
        "CREATE TABLE SubjectMatterCodes (ID INTEGER PRIMARY KEY, Code TEXT, SourceID INTEGER, Description TEXT, LastMod TEXT, IsLSC INTEGER)",
        "CREATE TABLE Sources (ID INTEGER PRIMARY KEY, Author TEXT, Title TEXT, Abbreviation TEXT, LastMod TEXT)",
        "CREATE TABLE Tests (TestID INTEGER PRIMARY KEY, TestName TEXT, TestAbbr TEXT, GroupID INTEGER, SortBy INTEGER, LastMod TEXT)",
        "CREATE TABLE TextConst (ID INTEGER PRIMARY KEY, ConstName TEXT, ConstValue TEXT, GroupID INTEGER, TestID INTEGER, LastMod TEXT)",
        "CREATE TABLE Images (ID INTEGER PRIMARY KEY, PicType INTEGER, GroupID INTEGER, TestID INTEGER, ImageName TEXT, Desc TEXT, FileName TEXT, BinImage BLOB, LastMod TEXT, FigureSectionID INTEGER, PixelsPerNM REAL, SortBy INTEGER, ImageLibraryID INTEGER)",
        "CREATE TABLE QuestionsACS (ID INTEGER PRIMARY KEY, QuestionID INTEGER, ACSID INTEGER)",
        "CREATE TABLE QuestionsRefImages (ID INTEGER PRIMARY KEY, QuestionID INTEGER, ImageID INTEGER, Annotation TEXT)",
        "CREATE TABLE QuestionsReferences (ID INTEGER PRIMARY KEY, QuestionID INTEGER, RefID INTEGER)",
        "CREATE TABLE QuestionsTests (ID INTEGER PRIMARY KEY, QuestionID INTEGER, TestID INTEGER, IsLinked INTEGER, SortBy INTEGER, LinkChapter INTEGER, IsImportant INTEGER)",
    ];
    for statement in ddl {
        sqlx::query(statement).execute(&remote).await.unwrap();
    }

    let data = [
        "INSERT INTO Questions VALUES (101, 'What airspace overlies KSFO?', 1, 1, 1, '2024-01-01', 'Class B surface area.', NULL, NULL)",
        "INSERT INTO Questions VALUES (102, 'What is VNE?', 2, 1, 1, '2024-01-02', 'Never-exceed speed.', NULL, 5)",
        "INSERT INTO Answers VALUES (201, 'Class B', 101, 1, '2024-01-01')",
        "INSERT INTO Answers VALUES (202, 'Class D', 101, 0, '2024-01-01')",
        "INSERT INTO Answers VALUES (203, 'Red line speed', 102, 1, '2024-01-02')",
        "INSERT INTO ACS VALUES (1, 1, NULL, 'PA.I.E.K1', 'Airspace classes', 0, '2024-01-01')",
        "INSERT INTO BinaryData VALUES (1, 1, 1, 'legend', 'chart legend', 'legend.bin', 1, x'0102', '2024-01-01')",
        "INSERT INTO Chapters VALUES (1, 'Airspace', 1, 1, '2024-01-01')",
        "INSERT INTO Chapters VALUES (2, 'Aerodynamics', 1, 2, '2024-01-01')",
        "INSERT INTO FigureSections VALUES (1, 'Sectional excerpts', '2024-01-01')",
        "INSERT INTO Groups VALUES (1, 'Airplane', 'AIR', '2024-01-01')",
        "INSERT INTO Library VALUES (1, 'US', NULL, 'FAR/AIM', 'Regulations', 0, 'FAA', 1, '2024-01-01')",
        "INSERT INTO Refs VALUES (1, 'FAR 91.155', '2024-01-01')",
        "INSERT INTO SubjectMatterCodes VALUES (1, 'B07', 1, 'Airspace', '2024-01-01', 0)",
        "INSERT INTO Sources VALUES (1, 'FAA', 'PHAK', 'PHAK', '2024-01-01')",
        "INSERT INTO Tests VALUES (1, 'Private Pilot Airplane', 'PAR', 1, 1, '2024-01-01')",
        "INSERT INTO TextConst VALUES (1, 'disclaimer', 'For training only', 1, 1, '2024-01-01')",
        "INSERT INTO Images VALUES (1, 1, 1, 1, 'Figure 1', 'Sectional chart', 'fig1.png', x'89504e47', '2024-01-01', 1, 6.85, 1, NULL)",
        "INSERT INTO QuestionsACS VALUES (1, 101, 1)",
        "INSERT INTO QuestionsRefImages VALUES (1, 101, 1, 'see legend')",
        "INSERT INTO QuestionsReferences VALUES (1, 101, 1)",
        "INSERT INTO QuestionsTests VALUES (1, 101, 1, 1, 1, NULL, 0)",
    ];
    for statement in data {
        sqlx::query(statement).execute(&remote).await.unwrap();
    }
    remote.close().await;
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn snapshot_sync_populates_every_table() {
    let h = harness().await;
    let report = h.updater.sync_snapshot(&h.snapshot, "PVT").await.unwrap();

    assert_eq!(report.len(), 18);
    assert!(report.iter().all(|t| t.error.is_none()));

    assert_eq!(count(&h.local, "questions").await, 2);
    assert_eq!(count(&h.local, "answers").await, 3);
    assert_eq!(count(&h.local, "images").await, 1);
    assert_eq!(count(&h.local, "acs").await, 1);
    assert_eq!(count(&h.local, "chapters").await, 2);
    assert_eq!(count(&h.local, "question_acs").await, 1);
    assert_eq!(count(&h.local, "question_tests").await, 1);

    let question = db::questions::find_by_remote_id_and_course(&h.local, 101, "PVT")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(question.text.as_deref(), Some("What airspace overlies KSFO?"));
    assert_eq!(question.course, "PVT");

    // Answers hang off the remote question id and get distinct letters
    // in snapshot order.
    let answers = db::answers::for_question(&h.local, 101).await.unwrap();
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0].choice.as_deref(), Some("A"));
    assert_eq!(answers[1].choice.as_deref(), Some("B"));
    assert!(answers[0].correct);
    assert!(!answers[1].correct);
}

#[tokio::test]
async fn resync_is_idempotent_and_keeps_choices() {
    let h = harness().await;
    h.updater.sync_snapshot(&h.snapshot, "PVT").await.unwrap();

    let before = db::answers::for_question(&h.local, 101).await.unwrap();
    let report = h.updater.sync_snapshot(&h.snapshot, "PVT").await.unwrap();
    assert!(report.iter().all(|t| t.error.is_none()));

    assert_eq!(count(&h.local, "questions").await, 2);
    assert_eq!(count(&h.local, "answers").await, 3);

    let after = db::answers::for_question(&h.local, 101).await.unwrap();
    let choices = |answers: &[gs_questions::models::Answer]| {
        answers.iter().map(|a| a.choice.clone()).collect::<Vec<_>>()
    };
    assert_eq!(choices(&before), choices(&after));
}

#[tokio::test]
async fn resync_preserves_local_discussion() {
    let h = harness().await;
    h.updater.sync_snapshot(&h.snapshot, "PVT").await.unwrap();

    sqlx::query("UPDATE answers SET discussion = 'local notes' WHERE remote_id = 201")
        .execute(&h.local)
        .await
        .unwrap();

    h.updater.sync_snapshot(&h.snapshot, "PVT").await.unwrap();

    let answer = db::answers::find_by_remote_id(&h.local, 201)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(answer.discussion.as_deref(), Some("local notes"));
}

#[tokio::test]
async fn one_bad_table_does_not_stop_the_rest() {
    let h = harness().await;

    // Snapshots occasionally ship without optional tables.
    let url = format!("sqlite://{}?mode=rwc", h.snapshot.display());
    let remote = SqlitePool::connect(&url).await.unwrap();
    sqlx::query("DROP TABLE Refs").execute(&remote).await.unwrap();
    remote.close().await;

    let report = h.updater.sync_snapshot(&h.snapshot, "PVT").await.unwrap();

    let refs = report.iter().find(|t| t.table == "refs").unwrap();
    assert!(refs.error.is_some());
    assert_eq!(refs.rows, 0);

    // Everything after the failed table still ran.
    assert_eq!(count(&h.local, "questions").await, 2);
    assert_eq!(count(&h.local, "answers").await, 3);
}

#[tokio::test]
async fn failed_fetch_releases_the_lock_and_fails_the_job() {
    let h = harness().await;

    h.updater.update_course("PVT").await;

    let status = h.jobs.get("PVT").await.unwrap();
    assert_eq!(status.state, JobState::Failed);
    assert!(status.error.is_some());
    assert!(!h.locks.is_held("PVT"));
}

#[tokio::test]
async fn cleanup_deletes_the_snapshot_even_when_the_cycle_fails() {
    let h = harness().await;

    // A leftover snapshot from an earlier aborted cycle sits at the
    // fetch destination.
    let leftover = h.dir.path().join("scratch").join("PVT.db");
    tokio::fs::create_dir_all(leftover.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(&leftover, b"stale snapshot").await.unwrap();

    h.updater.update_course("PVT").await;

    assert_eq!(h.jobs.get("PVT").await.unwrap().state, JobState::Failed);
    assert!(!leftover.exists());
    assert!(!h.locks.is_held("PVT"));
}

#[tokio::test]
async fn all_courses_sweep_reports_member_failures() {
    let h = harness().await;

    h.updater.update_all_courses().await;

    // Both configured courses failed against the unreachable source, so
    // the sweep record must not read as completed.
    let sweep = h.jobs.get(ALL_COURSES_KEY).await.unwrap();
    assert_eq!(sweep.state, JobState::Failed);
    let message = sweep.error.unwrap();
    assert!(message.contains("PVT"));
    assert!(message.contains("IFR"));
    assert!(!h.locks.is_held(ALL_COURSES_KEY));
}

#[tokio::test]
async fn held_lock_makes_update_a_no_op() {
    let h = harness().await;
    assert!(h.locks.try_acquire("PVT"));

    h.updater.update_course("PVT").await;

    // No job was started; the lock holder is undisturbed.
    assert!(h.jobs.get("PVT").await.is_none());
    assert!(h.locks.is_held("PVT"));
}
