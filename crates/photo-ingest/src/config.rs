//! Ingestion configuration
//!
//! All paths are resolved against an explicit root directory instead of the
//! process working directory.

use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Ingestion Defaults
// ============================================================================

/// Default root directory for input and output.
pub const DEFAULT_ROOT: &str = ".";

/// Default CSV file name, relative to the root.
pub const DEFAULT_INPUT: &str = "photos.csv";

/// Default output directory name, relative to the root.
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Manifest file name inside the output directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Default number of records transferred concurrently per group.
pub const DEFAULT_GROUP_SIZE: usize = 20;

/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent header for image requests.
pub const DEFAULT_USER_AGENT: &str = concat!("photo-ingest/", env!("CARGO_PKG_VERSION"));

/// Configuration for one ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory that relative input and output paths are resolved against
    pub root: PathBuf,

    /// CSV file with one record per row
    pub input: PathBuf,

    /// Output directory name; images, sidecars and the manifest go here
    pub output_dir: String,

    /// Records transferred concurrently; groups run one after another
    pub group_size: usize,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent sent with every image request
    pub user_agent: String,

    /// Only process the first N records (None = all)
    pub limit: Option<usize>,

    /// Draw a terminal progress bar while transferring
    #[serde(default)]
    pub show_progress: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            group_size: DEFAULT_GROUP_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            limit: None,
            show_progress: false,
        }
    }
}

impl IngestConfig {
    /// Create a builder starting from the defaults
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }

    /// Load configuration from `PHOTO_INGEST_*` environment variables
    ///
    /// Unset variables keep their defaults; a set but unparsable number is an
    /// error rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(root) = std::env::var("PHOTO_INGEST_ROOT") {
            config.root = PathBuf::from(root);
        }

        if let Ok(input) = std::env::var("PHOTO_INGEST_INPUT") {
            config.input = PathBuf::from(input);
        }

        if let Ok(dir) = std::env::var("PHOTO_INGEST_OUTPUT_DIR") {
            config.output_dir = dir;
        }

        if let Some(size) = parse_env("PHOTO_INGEST_GROUP_SIZE")? {
            config.group_size = size;
        }

        if let Some(secs) = parse_env("PHOTO_INGEST_TIMEOUT_SECS")? {
            config.timeout_secs = secs;
        }

        if let Some(limit) = parse_env("PHOTO_INGEST_LIMIT")? {
            config.limit = Some(limit);
        }

        if let Ok(agent) = std::env::var("PHOTO_INGEST_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.group_size == 0 {
            return Err(IngestError::config("Group size must be greater than 0"));
        }

        if self.timeout_secs == 0 {
            return Err(IngestError::config("Timeout must be greater than 0"));
        }

        if self.output_dir.trim().is_empty() {
            return Err(IngestError::config("Output directory cannot be empty"));
        }

        if self.input.as_os_str().is_empty() {
            return Err(IngestError::config("Input path cannot be empty"));
        }

        Ok(())
    }

    /// CSV path resolved against the root
    pub fn input_path(&self) -> PathBuf {
        resolve(&self.root, &self.input)
    }

    /// Output directory resolved against the root
    pub fn output_root(&self) -> PathBuf {
        resolve(&self.root, Path::new(&self.output_dir))
    }

    /// Location of the manifest written at the end of the run
    pub fn manifest_path(&self) -> PathBuf {
        self.output_root().join(MANIFEST_FILE_NAME)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| IngestError::config(format!("{name} must be a number, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}

/// Builder for IngestConfig
#[derive(Default)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn input(mut self, input: impl Into<PathBuf>) -> Self {
        self.config.input = input.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn group_size(mut self, size: usize) -> Self {
        self.config.group_size = size;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.config.limit = limit;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    pub fn build(self) -> IngestConfig {
        self.config
    }
}
