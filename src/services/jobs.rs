//! Update job status registry
//!
//! Update triggers return immediately; the work runs on a spawned task.
//! This registry is what gives callers visibility: each job (one per course
//! code, plus the "ALL" sweep) records its state, timestamps, and per-table
//! outcomes, pollable over the status endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Lifecycle of one update job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Running,
    Completed,
    Failed,
}

/// Outcome of one table synchronizer within a cycle
#[derive(Debug, Clone, Serialize)]
pub struct TableOutcome {
    pub table: String,
    pub rows: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Recorded status of one update job
#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub state: JobState,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TableOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Shared registry of update jobs, keyed by course code or "ALL"
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    inner: Arc<RwLock<HashMap<String, JobStatus>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a job as running, replacing any prior record for the key
    pub async fn start(&self, key: &str) {
        let mut jobs = self.inner.write().await;
        jobs.insert(
            key.to_string(),
            JobStatus {
                state: JobState::Running,
                started_at: Utc::now(),
                finished_at: None,
                tables: Vec::new(),
                error: None,
            },
        );
    }

    /// Record a job as finished. The job fails when a cycle-level error is
    /// given or any table reported one; otherwise it completes.
    pub async fn finish(&self, key: &str, tables: Vec<TableOutcome>, error: Option<String>) {
        let failed = error.is_some() || tables.iter().any(|t| t.error.is_some());
        let mut jobs = self.inner.write().await;
        if let Some(job) = jobs.get_mut(key) {
            job.state = if failed {
                JobState::Failed
            } else {
                JobState::Completed
            };
            job.finished_at = Some(Utc::now());
            job.tables = tables;
            job.error = error;
        }
    }

    /// Status of a single job
    pub async fn get(&self, key: &str) -> Option<JobStatus> {
        self.inner.read().await.get(key).cloned()
    }

    /// Snapshot of all recorded jobs
    pub async fn snapshot(&self) -> HashMap<String, JobStatus> {
        self.inner.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn table_error_marks_the_job_failed() {
        let registry = JobRegistry::new();
        registry.start("PVT").await;
        registry
            .finish(
                "PVT",
                vec![
                    TableOutcome {
                        table: "acs".to_string(),
                        rows: 10,
                        error: None,
                    },
                    TableOutcome {
                        table: "answers".to_string(),
                        rows: 0,
                        error: Some("boom".to_string()),
                    },
                ],
                None,
            )
            .await;

        let status = registry.get("PVT").await.unwrap();
        assert_eq!(status.state, JobState::Failed);
        assert!(status.finished_at.is_some());
    }

    #[tokio::test]
    async fn clean_cycle_completes() {
        let registry = JobRegistry::new();
        registry.start("IFR").await;
        registry
            .finish(
                "IFR",
                vec![TableOutcome {
                    table: "acs".to_string(),
                    rows: 3,
                    error: None,
                }],
                None,
            )
            .await;
        assert_eq!(registry.get("IFR").await.unwrap().state, JobState::Completed);
    }
}
