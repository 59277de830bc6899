//! Course update orchestration
//!
//! # State progression (per course)
//! Idle → Locked → Fetching → Syncing(18 tables) → Cleanup → Idle
//!
//! The per-course lock is taken first; failure to take it means another
//! update is in flight and the call is a silent no-op. A fetch failure is
//! terminal for the cycle (there is nothing sound to sync against), skipping
//! straight to cleanup. Table syncs run in dependency order: reference
//! tables first, then images, then questions (which consume decrypted
//! text), then answers, then the question association tables. A failure in
//! one table is isolated: it is logged, recorded in the cycle report, and
//! the remaining tables still run. Cleanup (snapshot delete + lock release)
//! always executes.

mod tables;

use crate::config::Config;
use crate::services::decryptor::GsDecryptor;
use crate::services::fetcher::ContentFetcher;
use crate::services::jobs::{JobRegistry, JobState, TableOutcome};
use crate::services::lock::{LockMap, ALL_COURSES_KEY};
use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Orchestrates per-course and all-course content updates
pub struct CourseUpdater {
    db: SqlitePool,
    config: Arc<Config>,
    fetcher: ContentFetcher,
    decryptor: GsDecryptor,
    locks: LockMap,
    jobs: JobRegistry,
}

impl CourseUpdater {
    pub fn new(
        db: SqlitePool,
        config: Arc<Config>,
        fetcher: ContentFetcher,
        decryptor: GsDecryptor,
        locks: LockMap,
        jobs: JobRegistry,
    ) -> Self {
        Self {
            db,
            config,
            fetcher,
            decryptor,
            locks,
            jobs,
        }
    }

    /// Update questions and answers for every configured course.
    ///
    /// Takes the global sweep lock; a concurrent sweep makes this a no-op.
    /// Each course still takes its own lock, and one course's failure does
    /// not stop the rest.
    pub async fn update_all_courses(&self) {
        if !self.locks.try_acquire(ALL_COURSES_KEY) {
            info!("Not updating all courses due to lock being set");
            return;
        }
        info!("Updating all questions for all courses");
        self.jobs.start(ALL_COURSES_KEY).await;

        let courses = self.config.courses.clone();
        for course in &courses {
            self.update_course(course).await;
        }

        // The sweep fails when any member course's job did.
        let mut failed = Vec::new();
        for course in &courses {
            if let Some(status) = self.jobs.get(course).await {
                if status.state == JobState::Failed {
                    failed.push(course.clone());
                }
            }
        }
        let error = if failed.is_empty() {
            None
        } else {
            Some(format!("Courses failed: {}", failed.join(", ")))
        };

        self.jobs.finish(ALL_COURSES_KEY, Vec::new(), error).await;
        self.locks.release(ALL_COURSES_KEY);
        info!("Finished updating all questions for all courses");
    }

    /// Update questions and answers for one course.
    pub async fn update_course(&self, course: &str) {
        if !self.locks.try_acquire(course) {
            info!("Not updating course {} due to lock being set", course);
            return;
        }
        info!("Updating {}", course);
        self.jobs.start(course).await;

        let outcome = self.run_cycle(course).await;

        // Cleanup is unconditional: delete the snapshot, release the lock.
        self.fetcher.cleanup(course).await;
        self.locks.release(course);

        match outcome {
            Ok(report) => self.jobs.finish(course, report, None).await,
            Err(e) => {
                error!("Error updating course {}: {}", course, e);
                self.jobs.finish(course, Vec::new(), Some(e.to_string())).await;
            }
        }
        info!("Finished updating {}", course);
    }

    async fn run_cycle(&self, course: &str) -> Result<Vec<TableOutcome>> {
        let snapshot = self.fetcher.fetch(course).await?;
        self.sync_snapshot(&snapshot, course).await
    }

    /// Sync every table from a downloaded snapshot into the local store.
    ///
    /// Public so an already-downloaded snapshot can be synced directly
    /// (and exercised in tests without a remote endpoint).
    pub async fn sync_snapshot(&self, snapshot: &Path, course: &str) -> Result<Vec<TableOutcome>> {
        info!("Updating questions and answers for course: {}", course);
        let remote_url = format!("sqlite://{}?mode=ro", snapshot.display());
        let remote = SqlitePool::connect(&remote_url).await?;

        let mut report = Vec::new();
        let local = &self.db;

        record(&mut report, course, "acs", tables::sync_acs(&remote, local).await);
        record(
            &mut report,
            course,
            "binary_data",
            tables::sync_binary_data(&remote, local).await,
        );
        record(
            &mut report,
            course,
            "chapters",
            tables::sync_chapters(&remote, local).await,
        );
        record(
            &mut report,
            course,
            "figure_sections",
            tables::sync_figure_sections(&remote, local).await,
        );
        record(
            &mut report,
            course,
            "groups",
            tables::sync_groups(&remote, local).await,
        );
        record(
            &mut report,
            course,
            "library",
            tables::sync_library(&remote, local).await,
        );
        record(&mut report, course, "refs", tables::sync_refs(&remote, local).await);
        record(
            &mut report,
            course,
            "subject_matter_codes",
            tables::sync_subject_matter_codes(&remote, local).await,
        );
        record(
            &mut report,
            course,
            "sources",
            tables::sync_sources(&remote, local).await,
        );
        record(&mut report, course, "tests", tables::sync_tests(&remote, local).await);
        record(
            &mut report,
            course,
            "text_const",
            tables::sync_text_const(&remote, local).await,
        );
        record(
            &mut report,
            course,
            "images",
            tables::sync_images(&remote, local).await,
        );
        record(
            &mut report,
            course,
            "questions",
            tables::sync_questions(&remote, local, &self.decryptor, course).await,
        );
        record(
            &mut report,
            course,
            "answers",
            tables::sync_answers(&remote, local, &self.decryptor).await,
        );
        record(
            &mut report,
            course,
            "question_acs",
            tables::sync_question_acs(&remote, local).await,
        );
        record(
            &mut report,
            course,
            "question_ref_images",
            tables::sync_question_ref_images(&remote, local).await,
        );
        record(
            &mut report,
            course,
            "question_references",
            tables::sync_question_references(&remote, local).await,
        );
        record(
            &mut report,
            course,
            "question_tests",
            tables::sync_question_tests(&remote, local).await,
        );

        remote.close().await;
        info!("Completed updating questions and answers for course: {}", course);
        Ok(report)
    }
}

/// Fold one table sync result into the cycle report, isolating failures.
fn record(
    report: &mut Vec<TableOutcome>,
    course: &str,
    table: &str,
    result: Result<u64>,
) {
    match result {
        Ok(rows) => {
            info!("Synced {} rows of {} for course: {}", rows, table, course);
            report.push(TableOutcome {
                table: table.to_string(),
                rows,
                error: None,
            });
        }
        Err(e) => {
            error!("Error syncing {} for course {}: {}", table, course, e);
            report.push(TableOutcome {
                table: table.to_string(),
                rows: 0,
                error: Some(e.to_string()),
            });
        }
    }
}
