//! Service layer: field transforms, snapshot retrieval, locking, and the
//! course update pipeline.

pub mod choice;
pub mod decryptor;
pub mod fetcher;
pub mod jobs;
pub mod lock;
pub mod sync;

pub use choice::derive_choice;
pub use decryptor::GsDecryptor;
pub use fetcher::ContentFetcher;
pub use jobs::{JobRegistry, JobState, JobStatus, TableOutcome};
pub use lock::{LockMap, ALL_COURSES_KEY};
pub use sync::CourseUpdater;
