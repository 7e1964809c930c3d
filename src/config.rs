//! TOML configuration. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:5000"
//! upload_dir = "static/uploads"
//!
//! [detector]
//! backend = "command"
//! program = "python3"
//! args = ["scripts/landmarks.py"]
//!
//! [logging]
//! level = "debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::detect::DetectorBackend;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub detector: DetectorBackend,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub analysis_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            upload_dir: PathBuf::from("static/uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
            analysis_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_toml(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.server.analysis_timeout(), Duration::from_secs(30));
        assert_eq!(config.detector, DetectorBackend::Disabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            upload_dir = "/tmp/uploads"

            [detector]
            backend = "command"
            program = "landmarker"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.upload_dir, PathBuf::from("/tmp/uploads"));
        assert_eq!(config.server.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(
            config.detector,
            DetectorBackend::Command {
                program: PathBuf::from("landmarker"),
                args: vec![],
            }
        );
    }

    #[test]
    fn load_reads_file_and_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        fs::write(&good, "[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(Config::load(&good).unwrap().logging.level, "debug");

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[server\n").unwrap();
        assert!(matches!(Config::load(&bad), Err(Error::Config(_))));

        assert!(matches!(
            Config::load(dir.path().join("missing.toml")),
            Err(Error::Io(_))
        ));
    }
}
