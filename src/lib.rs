//! gs-questions - Aviation exam content microservice
//!
//! Serves questions, answers, and figure images from a local SQLite store,
//! and keeps that store current by pulling per-course snapshot databases
//! from the upstream content provider.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::config::Config;
pub use crate::error::{Error, Result};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::decryptor::GsDecryptor;
use crate::services::fetcher::ContentFetcher;
use crate::services::jobs::JobRegistry;
use crate::services::lock::LockMap;
use crate::services::sync::CourseUpdater;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Local content database pool
    pub db: SqlitePool,
    /// Service configuration
    pub config: Arc<Config>,
    /// Per-course single-flight update locks
    pub locks: LockMap,
    /// Update job status registry
    pub jobs: JobRegistry,
    /// Course update pipeline
    pub updater: Arc<CourseUpdater>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let fetcher = ContentFetcher::new(&config)?;
        let decryptor = GsDecryptor::new(
            config.decrypt_enabled,
            &config.secret_key,
            &config.init_vector,
        )?;
        let locks = LockMap::new(Duration::from_secs(config.lock_ttl_seconds));
        let jobs = JobRegistry::new();
        let updater = Arc::new(CourseUpdater::new(
            db.clone(),
            config.clone(),
            fetcher,
            decryptor,
            locks.clone(),
            jobs.clone(),
        ));

        Ok(Self {
            db,
            config,
            locks,
            jobs,
            updater,
            startup_time: Utc::now(),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::question_routes())
        .merge(api::answer_routes())
        .merge(api::image_routes())
        .with_state(state)
}
