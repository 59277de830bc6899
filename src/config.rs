//! Configuration loading for gs-questions
//!
//! Resolution priority: environment variables override values from the TOML
//! file named by `GSQ_CONFIG` (default `gs-questions.toml`); anything still
//! unset falls back to a compiled default.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default course list, one code per certification track.
const DEFAULT_COURSES: &str = "PVT,IFR,COM,CFI,ATP,FLE,AMG,AMA,AMP,PAR,SPG,SPI,MIL,IOF,MCI,RDP";

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Local SQLite database path
    pub database_path: String,
    /// Scratch directory for downloaded course snapshots
    pub scratch_dir: String,
    /// Directory holding image files referenced by file name
    pub image_dir: String,
    /// Remote snapshot URL template; `{gid}` and `{course}` are substituted
    pub content_source_url: String,
    /// Course codes swept by an update-all run
    pub courses: Vec<String>,
    /// When false, field decryption is an identity pass-through
    pub decrypt_enabled: bool,
    /// Base64-encoded AES-128 secret key
    pub secret_key: String,
    /// 16-byte initialization vector
    pub init_vector: String,
    /// HTTP connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// HTTP read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Single-flight lock TTL in seconds; an abandoned lock self-expires
    pub lock_ttl_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: "gs-questions.db".to_string(),
            scratch_dir: std::env::temp_dir()
                .join("gs-questions")
                .display()
                .to_string(),
            image_dir: "images".to_string(),
            content_source_url: String::new(),
            courses: DEFAULT_COURSES.split(',').map(str::to_string).collect(),
            decrypt_enabled: false,
            secret_key: String::new(),
            init_vector: String::new(),
            connect_timeout_ms: 10_000,
            read_timeout_ms: 120_000,
            lock_ttl_seconds: 6 * 60 * 60,
        }
    }
}

impl Config {
    /// Load configuration from the TOML file named by `GSQ_CONFIG`
    /// (missing file is not an error), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("GSQ_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("gs-questions.toml"));
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML file, falling back to defaults
    /// when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("GSQ_SECRET_KEY") {
            self.secret_key = v;
        }
        if let Ok(v) = std::env::var("GSQ_INIT_VECTOR") {
            self.init_vector = v;
        }
        if let Ok(v) = std::env::var("GSQ_CONTENT_SOURCE_URL") {
            self.content_source_url = v;
        }
        if let Ok(v) = std::env::var("GSQ_DATABASE_PATH") {
            self.database_path = v;
        }
        if let Ok(v) = std::env::var("GSQ_SCRATCH_DIR") {
            self.scratch_dir = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.courses.len(), 16);
        assert!(!config.decrypt_enabled);
        assert_eq!(config.lock_ttl_seconds, 21_600);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::from_file(Path::new("/nonexistent/gsq.toml")).unwrap();
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn toml_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gsq.toml");
        std::fs::write(
            &path,
            "port = 9090\ncourses = [\"PVT\", \"IFR\"]\ndecrypt_enabled = true\n",
        )
        .unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.courses, vec!["PVT", "IFR"]);
        assert!(config.decrypt_enabled);
    }
}
