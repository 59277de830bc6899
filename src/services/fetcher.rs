//! Remote course snapshot retrieval
//!
//! Each course maps to a numeric program id; the two are templated into the
//! configured source URL and the snapshot is downloaded to
//! `<scratch_dir>/<course>.db`. The file is deleted after processing
//! regardless of outcome.

use crate::config::Config;
use crate::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Downloads and disposes of per-course snapshot files
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: reqwest::Client,
    source_template: String,
    scratch_dir: PathBuf,
}

impl ContentFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            source_template: config.content_source_url.clone(),
            scratch_dir: PathBuf::from(&config.scratch_dir),
        })
    }

    /// Numeric program id for a course code. Unknown codes are rejected
    /// before any network activity.
    pub fn program_id(course: &str) -> Result<u32> {
        let gid = match course {
            "PVT" => 1,
            "IFR" => 2,
            "COM" => 3,
            "CFI" => 4,
            "ATP" => 5,
            "FLE" => 6,
            "AMG" => 8,
            "AMA" => 9,
            "AMP" => 10,
            "PAR" => 11,
            "SPG" => 13,
            "SPI" => 15,
            "MIL" => 16,
            "IOF" => 17,
            "MCI" => 18,
            "RDP" => 19,
            _ => return Err(Error::InvalidInput(format!("Unknown course: {}", course))),
        };
        Ok(gid)
    }

    /// Local path the course snapshot is downloaded to
    pub fn snapshot_path(&self, course: &str) -> PathBuf {
        self.scratch_dir.join(format!("{}.db", course))
    }

    /// Download the course snapshot to local scratch storage
    pub async fn fetch(&self, course: &str) -> Result<PathBuf> {
        let gid = Self::program_id(course)?;
        let url = self
            .source_template
            .replace("{gid}", &gid.to_string())
            .replace("{course}", course);
        let destination = self.snapshot_path(course);

        info!("Copying {} to {}", url, destination.display());
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(&self.scratch_dir).await?;
        tokio::fs::write(&destination, &bytes).await?;
        info!("Course content retrieved for {}", course);

        Ok(destination)
    }

    /// Delete the downloaded snapshot. Errors are logged, never raised:
    /// cleanup must not fail the cycle.
    pub async fn cleanup(&self, course: &str) {
        let path = self.snapshot_path(course);
        info!("Deleting {}", path.display());
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Error cleaning up course content: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_ids_match_the_provider_table() {
        assert_eq!(ContentFetcher::program_id("PVT").unwrap(), 1);
        assert_eq!(ContentFetcher::program_id("IFR").unwrap(), 2);
        assert_eq!(ContentFetcher::program_id("ATP").unwrap(), 5);
        assert_eq!(ContentFetcher::program_id("AMG").unwrap(), 8);
        assert_eq!(ContentFetcher::program_id("SPI").unwrap(), 15);
        assert_eq!(ContentFetcher::program_id("RDP").unwrap(), 19);
    }

    #[test]
    fn unknown_course_is_rejected() {
        assert!(matches!(
            ContentFetcher::program_id("XYZ"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn snapshot_path_is_named_after_the_course() {
        let config = Config {
            scratch_dir: "/tmp/gsq".to_string(),
            ..Config::default()
        };
        let fetcher = ContentFetcher::new(&config).unwrap();
        assert_eq!(fetcher.snapshot_path("PVT"), PathBuf::from("/tmp/gsq/PVT.db"));
    }
}
